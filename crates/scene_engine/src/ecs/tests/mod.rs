//! Scenario tests for the scene graph
//!
//! Each module drives a small scene through the public manager API and checks
//! the observable event order with a shared [`Witness`] component.

mod hierarchy;

use std::cell::RefCell;
use std::rc::Rc;

use crate::ecs::{Component, ComponentContext, TickGroup};

/// Shared event log
pub(super) type EventLog = Rc<RefCell<Vec<String>>>;

/// Component that records every hook it receives as `label:hook`
pub(super) struct Witness {
    pub(super) label: &'static str,
    pub(super) group: TickGroup,
    pub(super) log: EventLog,
}

impl Witness {
    pub(super) fn new(label: &'static str, log: &EventLog) -> Self {
        Self::in_group(label, TickGroup::Standard, log)
    }

    pub(super) fn in_group(label: &'static str, group: TickGroup, log: &EventLog) -> Self {
        Self {
            label,
            group,
            log: Rc::clone(log),
        }
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.label, hook));
    }
}

impl Component for Witness {
    fn tick_group(&self) -> TickGroup {
        self.group
    }

    fn post_create(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record("create");
    }

    fn pre_destroy(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record("destroy");
    }

    fn tick(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        self.record("tick");
    }

    fn post_enable(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record("enable");
    }

    fn post_disable(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record("disable");
    }
}

/// Take and clear the log
pub(super) fn drain(log: &EventLog) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

type TickScript = Box<dyn FnMut(&mut ComponentContext<'_>)>;

/// Component that runs a closure on every tick
pub(super) struct Script {
    group: TickGroup,
    on_tick: TickScript,
}

impl Script {
    pub(super) fn new(group: TickGroup, on_tick: impl FnMut(&mut ComponentContext<'_>) + 'static) -> Self {
        Self {
            group,
            on_tick: Box::new(on_tick),
        }
    }
}

impl Component for Script {
    fn tick_group(&self) -> TickGroup {
        self.group
    }

    fn tick(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        (self.on_tick)(ctx);
    }
}
