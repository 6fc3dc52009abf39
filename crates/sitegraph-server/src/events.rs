//! Event sinks for site join/unjoin events.
//!
//! Posting never blocks and never fails the caller: a closed channel is
//! logged and the event is dropped.

use sitegraph_domain::{EventSink, SiteEvent};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Sink that forwards events to a tokio channel for an async consumer.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<SiteEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SiteEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn post(&self, event: SiteEvent) {
        if let Err(e) = self.sender.send(event) {
            warn!(
                kind = ?e.0.kind,
                site = %e.0.site,
                "Event receiver closed, dropping site event"
            );
        }
    }
}

/// Sink that records events in the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn post(&self, event: SiteEvent) {
        info!(
            kind = ?event.kind,
            site = %event.site,
            group_id = %event.group,
            user_id = %event.user,
            "Site event"
        );
    }
}
