use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E)>;

/// Synchronous broadcast to zero or more subscribers.
///
/// Callbacks run in subscription order on the emitting thread, then every
/// live channel receives a clone of the event. Channels whose receiver was
/// dropped are pruned during the emit that notices it.
pub struct Signal<E> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
    channels: Vec<Sender<E>>,
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
            channels: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("callbacks", &self.callbacks.len())
            .field("channels", &self.channels.len())
            .finish()
    }
}

impl<E: Clone> Signal<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn subscribe_channel(&mut self) -> Receiver<E> {
        let (sender, receiver) = mpsc::channel();
        self.channels.push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len() + self.channels.len()
    }

    /// Returns how many subscribers received the event.
    pub fn emit(&mut self, event: &E) -> usize {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
        let mut delivered = self.callbacks.len();
        self.channels.retain(|sender| sender.send(event.clone()).is_ok());
        delivered += self.channels.len();
        delivered
    }
}
