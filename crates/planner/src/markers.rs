use indexmap::IndexMap;
use model::{marker::Marker, Coordinate};
use utility::id::{Id, IdGenerator};

/// Arena of the markers currently shown for the path, in path order.
#[derive(Default)]
pub struct MarkerRegistry {
    markers: IndexMap<Id<Marker>, Marker>,
    ids: IdGenerator<Marker>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, coordinate: Coordinate) -> Id<Marker> {
        let id = self.ids.next_id();
        self.markers.insert(id, Marker { coordinate });
        id
    }

    /// Releases every marker and returns their ids.
    pub fn release_all(&mut self) -> Vec<Id<Marker>> {
        self.markers.drain(..).map(|(id, _)| id).collect()
    }

    pub fn get(&self, id: &Id<Marker>) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn ids(&self) -> Vec<Id<Marker>> {
        self.markers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
