//! Action processor
//!
//! Turns pending actions into handlers and runs the handlers interested in
//! the current phase. Each call does admit -> dispatch -> reap.

use crate::battle::context::SimulationContext;
use crate::battle::handlers::ActionHandler;

#[derive(Debug, Default)]
pub struct ActionsProcessor {
    handlers: Vec<ActionHandler>,
}

impl ActionsProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn handlers(&self) -> &[ActionHandler] {
        &self.handlers
    }

    /// Run one processing pass for the context's current phase
    pub fn handle_actions(&mut self, ctx: &mut SimulationContext) {
        // ===== ADMIT =====
        for action in ctx.take_pending_actions() {
            match action.validate(ctx) {
                Ok(()) => self.handlers.push(action.create_handler()),
                Err(reason) => {
                    tracing::warn!(action = action.label(), %reason, "dropping invalid action");
                }
            }
        }

        // ===== DISPATCH =====
        let phase = ctx.phase();
        for handler in self.handlers.iter_mut() {
            if handler.cares_about_phase(phase) {
                handler.handle(ctx);
            }
        }

        // ===== REAP =====
        self.handlers.retain(|h| !h.is_finished());
    }
}
