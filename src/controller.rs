//! Controller — the serialized event loop.
//!
//! Ties the [`AlarmService`] to its [`Dispatcher`] through a FIFO
//! [`EventQueue`].  Exactly one event is processed at a time, and its
//! effects are fully dispatched before the next event is popped.  The
//! siren timer feeds back through the same queue: once the queue runs
//! dry, a due countdown is turned into a [`AlarmEvent::SirenElapsed`]
//! and processed like any other event.
//!
//! The controller owns no clock.  Callers pass the monotonic time in
//! milliseconds, which keeps every scenario reproducible in tests.

use log::debug;

use crate::app::dispatcher::Dispatcher;
use crate::app::ports::{ActuatorPort, AlertPort, PublishPort, StatePort};
use crate::app::service::AlarmService;
use crate::events::{AlarmEvent, EventQueue};

pub struct Controller<P, S, A, L>
where
    P: PublishPort,
    S: StatePort,
    A: ActuatorPort,
    L: AlertPort,
{
    service: AlarmService,
    dispatcher: Dispatcher<P, S, A, L>,
    queue: EventQueue,
}

impl<P, S, A, L> Controller<P, S, A, L>
where
    P: PublishPort,
    S: StatePort,
    A: ActuatorPort,
    L: AlertPort,
{
    pub fn new(service: AlarmService, dispatcher: Dispatcher<P, S, A, L>) -> Self {
        Self {
            service,
            dispatcher,
            queue: EventQueue::new(),
        }
    }

    /// Publish the startup notification and restore the outputs.
    pub fn start(&mut self) {
        let effects = self.service.start();
        self.dispatcher.dispatch(&effects);
    }

    /// Enqueue an event.  Returns `false` if the queue is full.
    pub fn submit(&mut self, event: AlarmEvent) -> bool {
        self.queue.push(event)
    }

    /// Process every pending event, then any due countdown, until
    /// nothing is left at `now_ms`.  Returns the number of events handled.
    pub fn run_pending(&mut self, now_ms: u64) -> usize {
        let mut handled = 0;
        loop {
            while let Some(event) = self.queue.pop() {
                let effects = self.service.handle(&event, now_ms);
                self.dispatcher.dispatch(&effects);
                handled += 1;
            }
            match self.service.due_timer(now_ms) {
                Some(token) => {
                    debug!("Siren timer {} due at {}ms", token.raw(), now_ms);
                    self.queue.push(AlarmEvent::SirenElapsed(token));
                }
                None => break,
            }
        }
        handled
    }

    /// Deadline of the pending countdown, if any.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.service.next_deadline_ms()
    }

    pub fn service(&self) -> &AlarmService {
        &self.service
    }

    pub fn dispatcher(&self) -> &Dispatcher<P, S, A, L> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<P, S, A, L> {
        &mut self.dispatcher
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }
}
