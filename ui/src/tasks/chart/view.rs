use dioxus::prelude::*;
use futures_util::StreamExt;

use crate::core::timing::InstantStamp;
use crate::core::{format, platform, timing};
use crate::t;

use super::context::SharedSession;
use super::driver;
use super::engine::{Action, Phase, Transition};
use super::layout::ChartLayout;
use super::session::{ChartSession, LastWrite, WriteStatus};
use super::svg::ChartFigure;

#[component]
pub fn ChartTaskView() -> Element {
    match try_use_context::<SharedSession>() {
        Some(SharedSession::Ready(session)) => rsx! { ChartTaskPanel { session } },
        Some(SharedSession::Unavailable(message)) => rsx! { DataUnavailablePanel { message } },
        None => rsx! {
            DataUnavailablePanel { message: "The task session was not initialised.".to_string() }
        },
    }
}

/// Replaces the task when the chart data could not be loaded.
#[component]
pub fn DataUnavailablePanel(message: String) -> Element {
    rsx! {
        div { class: "task-chart__error", role: "alert",
            h3 { {t!("task-error-title")} }
            p { "{message}" }
            p { {t!("task-error-hint")} }
        }
    }
}

#[component]
fn ChartTaskPanel(session: Signal<ChartSession>) -> Element {
    let mut session = session;
    let mut feedback = use_signal(|| Option::<String>::None);

    let coroutine = use_coroutine(move |mut rx: UnboundedReceiver<ChartEvent>| async move {
        while let Some(ChartEvent { action, at }) = rx.next().await {
            let transition = session.with_mut(|s| s.dispatch(action, at));
            match transition {
                Transition::Started { trial_id, .. } => {
                    feedback.set(None);
                    spawn_ticker(session, trial_id);
                }
                Transition::Incorrect { attempts, .. } => {
                    feedback.set(Some(t!("task-feedback-incorrect", attempts = attempts)));
                }
                Transition::Completed(done) => {
                    let seconds = format::format_seconds(done.elapsed.as_secs_f64());
                    feedback.set(Some(t!("task-feedback-correct", seconds = seconds)));
                }
                Transition::Acknowledged | Transition::Reset => feedback.set(None),
                Transition::Ignored(_) => {}
            }
        }
    });

    // Leaving the page abandons the running trial and stops its tick loop.
    use_drop(move || {
        if let Ok(mut s) = session.try_write() {
            s.dispatch(Action::Reset, timing::now());
        }
    });

    let send = move |action: Action| {
        coroutine.send(ChartEvent {
            action,
            at: timing::now(),
        });
    };

    let snapshot = session.read();
    let phase = snapshot.engine.phase();
    let running = phase == Phase::Running;
    let clock = format::format_clock(snapshot.engine.state.elapsed);
    let layout = snapshot
        .engine
        .state
        .variant
        .filter(|_| running)
        .map(|variant| ChartLayout::build(variant, snapshot.dataset()));
    let question = snapshot.config.question.clone();
    let answers = snapshot.config.answers.clone();
    let completed = snapshot.log().len();
    let last_write = snapshot.last_write().cloned();
    drop(snapshot);

    let feedback_line = feedback();

    rsx! {
        article { class: "task task-chart",
            div { class: "task-chart__controls",
                button {
                    r#type: "button",
                    class: "task-chart__go",
                    disabled: phase != Phase::Idle,
                    onclick: move |_| send(Action::Start),
                    {t!("task-go")}
                }
                span { class: "task-chart__clock", "{clock}" }
                span { class: "task-chart__progress", {t!("task-completed-count", count = completed)} }
            }

            p { class: "task-chart__question", "{question}" }

            div { class: "task-chart__stage",
                if let Some(layout) = layout {
                    ChartFigure { layout }
                } else if phase == Phase::Answered {
                    div { class: "task-chart__welcome",
                        p { {t!("task-answered")} }
                        button {
                            r#type: "button",
                            class: "task-chart__next",
                            onclick: move |_| send(Action::Acknowledge),
                            {t!("task-start-new")}
                        }
                    }
                } else {
                    div { class: "task-chart__welcome",
                        h3 { {t!("task-welcome-title")} }
                        p { {t!("task-welcome-body")} }
                    }
                }
            }

            div { class: "task-chart__answers",
                for (idx, label) in answers.into_iter().enumerate() {
                    button {
                        key: "{idx}",
                        r#type: "button",
                        class: "task-chart__answer",
                        disabled: !running,
                        onclick: move |_| send(Action::Answer(idx)),
                        "{label}"
                    }
                }
            }

            if let Some(line) = feedback_line {
                p { class: "task-chart__feedback", "{line}" }
            }

            LastWriteStatus { last_write }
        }
    }
}

#[component]
fn LastWriteStatus(last_write: Option<LastWrite>) -> Element {
    let Some(last) = last_write else {
        return rsx! {
            p { class: "task-chart__status task-chart__status--empty", {t!("task-status-none")} }
        };
    };

    let seconds = format::format_seconds(last.record.elapsed_seconds);
    let (modifier, outcome) = match &last.status {
        WriteStatus::Pending => ("pending", t!("task-status-pending")),
        WriteStatus::Saved => ("saved", t!("task-status-saved")),
        WriteStatus::Failed(reason) => (
            "failed",
            t!("task-status-failed", reason = reason.clone()),
        ),
    };

    rsx! {
        p { class: "task-chart__status task-chart__status--{modifier}",
            {t!(
                "task-status-line",
                sequence = last.sequence,
                id = last.record.subject_category,
                seconds = seconds,
                at = last.recorded_at.clone()
            )}
            " · {outcome}"
        }
    }
}

fn spawn_ticker(mut session: Signal<ChartSession>, trial_id: u64) {
    let interval_ms = session.read().config.tick_interval_ms;
    platform::spawn_future(async move {
        driver::drive(interval_ms, timing::sleep_ms, timing::now, move |stamp| {
            session.with_mut(|s| s.tick_for(trial_id, stamp))
        })
        .await;
    });
}

#[derive(Debug, Clone, Copy)]
struct ChartEvent {
    action: Action,
    at: InstantStamp,
}
