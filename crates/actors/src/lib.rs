use std::panic::AssertUnwindSafe;

use actor::{Actor, SupervisionStrategy};
use actor_ref::{ActorRef, WeakActorRef};
use futures::FutureExt;
use mailbox::{bounded_mailbox, MailboxReceiver};

pub mod actor;
pub mod actor_ref;
pub mod handler;
pub mod mailbox;

const MAILBOX_SIZE: usize = 32;

/// Creates and runs an actor. If the actor panics, it is either restared, resumed
/// or stoped acording to the behavior specified by `Actor::on_fail()`.
///
/// The actor stops once every [`ActorRef`] to it has been dropped.
pub fn run<A, F>(actor_factory: F) -> ActorRef<A>
where
    A: Actor,
    F: 'static + Send + Fn() -> A,
{
    let (tx, mut rx) = bounded_mailbox(MAILBOX_SIZE);
    let myself = WeakActorRef::new(tx.downgrade());
    let actor_ref = ActorRef::new(tx);

    // run actor
    tokio::spawn(async move {
        let mut actor = actor_factory();
        actor.started(myself.clone());

        while let Some(mut message) = rx.recv().await {
            // handle message
            let result = AssertUnwindSafe(message.handle(&mut actor))
                .catch_unwind()
                .await;
            // handler paniced?
            if let Err(why) = result {
                log::error!("actor paniced: {:?}", why);
                match actor.on_fail(why) {
                    SupervisionStrategy::Restart => {
                        actor = actor_factory();
                        actor.started(myself.clone());
                    }
                    SupervisionStrategy::Resume => {}
                    SupervisionStrategy::Stop => {
                        break;
                    }
                };
            }
        }
    });

    actor_ref
}

/// Run an actor without supervision. This is not recommended.
pub fn run_unsupervised<A: Actor>(mut actor: A) -> ActorRef<A> {
    let (tx, mut rx) = bounded_mailbox(MAILBOX_SIZE);
    let actor_ref = ActorRef::new(tx);
    actor.started(actor_ref.downgrade());

    // run actor
    tokio::spawn(async move {
        while let Some(mut message) = rx.recv().await {
            message.handle(&mut actor).await;
        }
    });

    actor_ref
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::{
        actor::{Actor, SupervisionStrategy},
        actor_ref::{ActorRef, WeakActorRef},
        handler::{Handler, Message},
        run, run_unsupervised,
    };

    struct Increment {
        value: i64,
    }

    impl Message for Increment {
        type Response = ();
    }

    struct GetValue;

    impl Message for GetValue {
        type Response = i64;
    }

    struct Explode;

    impl Message for Explode {
        type Response = ();
    }

    /// Not `Clone`: carries a one-shot reply channel.
    struct Notify(oneshot::Sender<i64>);

    impl Message for Notify {
        type Response = ();
    }

    /// Asks the counter to increment itself through its weak self reference.
    struct IncrementLater;

    impl Message for IncrementLater {
        type Response = ();
    }

    #[derive(Default)]
    struct Counter {
        count: i64,
        myself: Option<WeakActorRef<Counter>>,
        strategy: Option<SupervisionStrategy>,
    }

    impl Actor for Counter {
        fn started(&mut self, myself: WeakActorRef<Self>) {
            self.myself = Some(myself);
        }

        fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
            self.strategy.clone().unwrap_or(SupervisionStrategy::Restart)
        }
    }

    #[async_trait]
    impl Handler<Increment> for Counter {
        async fn handle(&mut self, message: Increment) {
            self.count += message.value;
        }
    }

    #[async_trait]
    impl Handler<GetValue> for Counter {
        async fn handle(&mut self, _: GetValue) -> i64 {
            self.count
        }
    }

    #[async_trait]
    impl Handler<Explode> for Counter {
        async fn handle(&mut self, _: Explode) {
            panic!("boom");
        }
    }

    #[async_trait]
    impl Handler<Notify> for Counter {
        async fn handle(&mut self, message: Notify) {
            let _ = message.0.send(self.count);
        }
    }

    #[async_trait]
    impl Handler<IncrementLater> for Counter {
        async fn handle(&mut self, _: IncrementLater) {
            if let Some(myself) = self.myself.clone() {
                tokio::spawn(async move {
                    myself.tell(Increment { value: 10 }).await;
                });
            }
        }
    }

    #[async_trait]
    trait CounterRef {
        async fn increment(&self, value: i64);
        async fn get_value(&self) -> i64;
    }

    #[async_trait]
    impl CounterRef for ActorRef<Counter> {
        async fn increment(&self, value: i64) {
            self.tell(Increment { value }).await.unwrap();
        }

        async fn get_value(&self) -> i64 {
            self.ask(GetValue).await.unwrap()
        }
    }

    #[tokio::test]
    async fn test_messages_are_handled_in_order() {
        let counter = run(Counter::default);
        counter.increment(1).await;
        counter.increment(5).await;
        counter.increment(-2).await;
        assert_eq!(counter.get_value().await, 4);
    }

    #[tokio::test]
    async fn test_restart_after_panic() {
        let counter = run(Counter::default);
        counter.increment(3).await;

        let answer = counter.ask(Explode).await;
        assert!(answer.is_err());
        assert_eq!(counter.get_value().await, 0);
    }

    #[tokio::test]
    async fn test_resume_after_panic() {
        let counter = run(|| Counter {
            strategy: Some(SupervisionStrategy::Resume),
            ..Default::default()
        });
        counter.increment(3).await;
        let _ = counter.ask(Explode).await;
        assert_eq!(counter.get_value().await, 3);
    }

    #[tokio::test]
    async fn test_stop_after_panic() {
        let counter = run(|| Counter {
            strategy: Some(SupervisionStrategy::Stop),
            ..Default::default()
        });
        let _ = counter.ask(Explode).await;
        assert!(counter.ask(GetValue).await.is_err());
    }

    #[tokio::test]
    async fn test_messages_need_not_be_clone() {
        let counter = run_unsupervised(Counter {
            count: 7,
            ..Default::default()
        });
        let (tx, rx) = oneshot::channel();
        counter.tell(Notify(tx)).await.unwrap();
        assert_eq!(rx.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_weak_self_reference() {
        let counter = run(Counter::default);
        counter.tell(IncrementLater).await.unwrap();

        for _ in 0..100 {
            if counter.get_value().await == 10 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(counter.get_value().await, 10);
    }

    #[tokio::test]
    async fn test_weak_reference_does_not_keep_actor_alive() {
        let counter = run(Counter::default);
        let weak = counter.downgrade();
        assert!(weak.upgrade().is_some());

        drop(counter);
        assert!(weak.upgrade().is_none());
        assert!(!weak.tell(Increment { value: 1 }).await);
    }
}
