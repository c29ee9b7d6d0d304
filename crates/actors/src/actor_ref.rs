use tokio::sync::oneshot;

use crate::{
    actor::{Actor, ActorError},
    handler::{ActorMessage, Handler, Message},
    mailbox::{BoundedMailbox, Mailbox, WeakBoundedMailbox},
};

pub struct ActorRef<A: Actor> {
    sender: BoundedMailbox<A>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub(crate) fn new(sender: BoundedMailbox<A>) -> Self {
        Self { sender }
    }

    /// A handle that does not keep the actor alive.
    pub fn downgrade(&self) -> WeakActorRef<A> {
        WeakActorRef {
            sender: self.sender.downgrade(),
        }
    }

    pub async fn tell<M>(&self, msg: M) -> Result<(), ActorError<A, BoundedMailbox<A>>>
    where
        M: Message,
        A: Handler<M>,
    {
        let message = ActorMessage::<M, A>::new(msg, None);
        self.sender
            .send(message)
            .await
            .map_err(|why| ActorError::<A, BoundedMailbox<A>>::SendError(why))
    }

    pub async fn ask<M>(&self, msg: M) -> Result<M::Response, ActorError<A, BoundedMailbox<A>>>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_tx, response_rx) = oneshot::channel();
        let message = ActorMessage::<M, A>::new(msg, Some(response_tx));
        self.sender
            .send(message)
            .await
            .map_err(|why| ActorError::<A, BoundedMailbox<A>>::SendError(why))?;
        response_rx
            .await
            .map_err(|why| ActorError::ReceiveAnswerError(why))
    }
}

/// Non-owning counterpart of [`ActorRef`]. The actor stops once only weak
/// references remain.
pub struct WeakActorRef<A: Actor> {
    sender: WeakBoundedMailbox<A>,
}

impl<A: Actor> Clone for WeakActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> WeakActorRef<A> {
    pub(crate) fn new(sender: WeakBoundedMailbox<A>) -> Self {
        Self { sender }
    }

    pub fn upgrade(&self) -> Option<ActorRef<A>> {
        self.sender.upgrade().map(ActorRef::new)
    }

    /// Sends `msg` if the actor is still reachable. Returns whether it was
    /// delivered to the mailbox.
    pub async fn tell<M>(&self, msg: M) -> bool
    where
        M: Message,
        A: Handler<M>,
    {
        match self.upgrade() {
            Some(actor_ref) => actor_ref.tell(msg).await.is_ok(),
            None => false,
        }
    }
}
