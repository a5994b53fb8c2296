use std::{
    sync::{
        mpsc,
        Arc,
    },
    thread,
};

use tokio::runtime::Runtime;

use super::types::{
    Action,
    ChannelView,
    FormSnapshot,
    Notifier,
    ViewUpdate,
};
use crate::{
    controller::Controller,
    core::AnkifyError,
};

/// Runs controller actions off the UI thread and funnels their view writes back through
/// one channel, so the UI applies them strictly in arrival order.
///
/// Actions are not serialized against each other: two quick clicks give two overlapping
/// requests, and whichever finishes last owns the status line.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<ViewUpdate>,
    sender: mpsc::Sender<ViewUpdate>,
    controller: Controller,
    notify: Notifier,
}

impl TaskManager {
    pub fn new(controller: Controller) -> Result<Self, AnkifyError> {
        let runtime = Arc::new(Runtime::new()?);

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, receiver, sender, controller, notify: Arc::new(|| {}) })
    }

    /// Called after every queued update, typically to request a repaint.
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Arc::new(notify);
        self
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn poll_updates(&mut self) -> Vec<ViewUpdate> {
        let mut updates = Vec::new();

        while let Ok(update) = self.receiver.try_recv() {
            updates.push(update);
        }

        updates
    }

    fn task_context(&self, form: FormSnapshot) -> (ChannelView, Arc<Runtime>, Controller) {
        (
            ChannelView::new(form, self.sender.clone(), self.notify.clone()),
            self.runtime.clone(),
            self.controller.clone(),
        )
    }

    pub fn run(&self, form: FormSnapshot, action: Action) -> thread::JoinHandle<()> {
        let (mut view, runtime, controller) = self.task_context(form);

        tracing::debug!(task = action.task_type(), "starting");

        thread::spawn(move || {
            runtime.block_on(async {
                match action {
                    Action::Init(params) => controller.init(&mut view, params).await,
                    Action::EmailCommitted => controller.on_email_committed(&mut view).await,
                    Action::Subscribe => controller.subscribe(&mut view).await,
                    Action::ManageBilling => controller.manage_billing(&mut view).await,
                    Action::BuildDeck => controller.build_deck(&mut view).await,
                    Action::RefreshStatus => {
                        controller.refresh_health(&mut view).await;
                        controller.refresh_usage(&mut view).await;
                    }
                    Action::ResetUsage(cap) => controller.reset_usage(&mut view, cap).await,
                }
            });
            tracing::debug!(task = action.task_type(), "finished");
        })
    }
}
