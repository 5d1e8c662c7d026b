use crate::state::events::Event;

/// An Event tagged with the simulation tick which produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub tick: u64,
    pub event: Event,
}

pub trait MessageHandler {
    fn handle_message(&mut self, message: &Message);
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    pub events: Vec<Event>,
}

impl Dispatcher {
    pub fn broadcast(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the current event buffer, and clears it.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Returns the current event buffer tagged with `tick`, and clears it.
    pub fn drain_messages(&mut self, tick: u64) -> Vec<Message> {
        self.drain()
            .into_iter()
            .map(|event| Message { tick, event })
            .collect()
    }

    pub fn dispatch(messages: &[Message], handler: &mut dyn MessageHandler) {
        for m in messages {
            handler.handle_message(m);
        }
    }
}
