use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::{unbounded, UnboundedReceiver};

use crate::core::{platform, storage};

use super::session::{ChartSession, DiscardSink, ResponseSink};
use super::writer::{drain_writes, QueuedSink, WriteJob};

/// The session every page reads, or the reason there is none.
#[derive(Clone, PartialEq)]
pub enum SharedSession {
    Ready(Signal<ChartSession>),
    Unavailable(String),
}

type WriterSlot = Rc<RefCell<Option<UnboundedReceiver<WriteJob>>>>;

/// Create the app-wide session from the installed backend and start the
/// response writer. Call once from the launcher's root component, before the router.
pub fn use_session_provider() -> SharedSession {
    let writer_slot: WriterSlot = use_hook(|| Rc::new(RefCell::new(None)));

    let slot_for_session = writer_slot.clone();
    let shared = use_context_provider(move || build_session(&slot_for_session));

    let shared_for_writer = shared.clone();
    use_hook(move || start_writer(&shared_for_writer, &writer_slot));

    shared
}

fn build_session(writer_slot: &WriterSlot) -> SharedSession {
    let Some(backend) = storage::backend() else {
        tracing::error!("no backend installed before launch");
        return SharedSession::Unavailable("No data connection was configured.".to_string());
    };
    let startup = match &backend.startup {
        Ok(startup) => startup,
        Err(message) => return SharedSession::Unavailable(message.clone()),
    };

    let mode = backend.config.sheets.write_mode;
    let sink: Box<dyn ResponseSink> = if backend.gateway.is_some() {
        let (tx, rx) = unbounded();
        writer_slot.borrow_mut().replace(rx);
        Box::new(QueuedSink::new(tx, mode))
    } else {
        Box::new(DiscardSink)
    };

    SharedSession::Ready(Signal::new(ChartSession::new(
        backend.config.task.clone(),
        startup.dataset.clone(),
        startup.responses.clone(),
        sink,
    )))
}

fn start_writer(shared: &SharedSession, writer_slot: &WriterSlot) {
    let SharedSession::Ready(mut session) = shared.clone() else {
        return;
    };
    let Some(rx) = writer_slot.borrow_mut().take() else {
        return;
    };
    let Some(backend) = storage::backend() else {
        return;
    };
    let Some(gateway) = backend.gateway.clone() else {
        return;
    };
    let mode = backend.config.sheets.write_mode;

    platform::spawn_future(async move {
        drain_writes(rx, gateway, mode, move |sequence, status| {
            session.with_mut(|s| s.mark_write(sequence, status));
        })
        .await;
        tracing::debug!("response writer stopped");
    });
}
