//! Scheduler — owns the switches, re-evaluates them on a fixed resolution,
//! and dispatches the resulting values to the device.
//!
//! The loop walks unix seconds one at a time. Each iteration sleeps until
//! its second is reached on the wall clock, then evaluates every switch if
//! the second is a multiple of the resolution. Seconds are never skipped:
//! when evaluation overruns, the loop simply stops sleeping until it has
//! caught up.
//!
//! Switch state, the timer id counter, and the current second live behind
//! one [`Mutex`]. Evaluation snapshots the values to send while holding the
//! lock and dispatches after releasing it, so control calls never observe a
//! half-evaluated tick. The dispatches of one tick run concurrently and
//! their failures are logged, never retried.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::DateTime;
use chrono_tz::Tz;
use tokio::sync::Mutex;

use sunswitch_domain::error::{NotFoundError, SunswitchError, ValidationError};
use sunswitch_domain::id::{TimerId, TimerIdAllocator};
use sunswitch_domain::solar::{SolarClock, SolarSite};
use sunswitch_domain::switch::{
    AccumulationPolicy, DEFAULT_OFF_VALUE, DEFAULT_ON_VALUE, ScheduledTimer, SwitchMode,
    SwitchState,
};
use sunswitch_domain::switch_config::{SwitchDefinition, SwitchSpec, SwitchesSpec};
use sunswitch_domain::time::instant_at;
use sunswitch_domain::timer_rule::TimerRule;

use crate::ports::{Clock, DeviceClient, SystemClock};

/// Tunables of a [`Scheduler`].
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// Evaluate every `resolution` seconds. Must be non-zero.
    pub resolution: u32,
    /// How timer rules combine.
    pub policy: AccumulationPolicy,
    /// Zone in which daily triggers and time-of-day comparisons are read.
    pub timezone: Tz,
    /// Value dispatched to switch off.
    pub off_value: i64,
    /// On value for switches that do not configure one.
    pub default_on_value: i64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            resolution: 600,
            policy: AccumulationPolicy::default(),
            timezone: Tz::UTC,
            off_value: DEFAULT_OFF_VALUE,
            default_on_value: DEFAULT_ON_VALUE,
        }
    }
}

struct Inner {
    switches: BTreeMap<String, SwitchState>,
    timer_ids: TimerIdAllocator,
    current_second: i64,
}

/// Periodic switch evaluator.
pub struct Scheduler<S, D, C = SystemClock> {
    settings: SchedulerSettings,
    site: SolarSite<S>,
    device: D,
    clock: C,
    inner: Mutex<Inner>,
}

impl<S, D, C> Scheduler<S, D, C>
where
    S: SolarClock + Send + Sync,
    D: DeviceClient + Send + Sync,
    C: Clock + Send + Sync,
{
    /// Create a scheduler with no switches.
    ///
    /// # Panics
    ///
    /// Panics if `settings.resolution` is zero.
    pub fn new(settings: SchedulerSettings, site: SolarSite<S>, device: D, clock: C) -> Self {
        assert!(settings.resolution > 0, "resolution must be non-zero");
        let current_second = clock.now().timestamp();
        Self {
            settings,
            site,
            device,
            clock,
            inner: Mutex::new(Inner {
                switches: BTreeMap::new(),
                timer_ids: TimerIdAllocator::default(),
                current_second,
            }),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Add every switch of `switches`, allocating fresh timer ids.
    ///
    /// The whole map is validated first; on error nothing is added.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMode`] or
    /// [`ValidationError::InvalidTimerSpec`] for a malformed spec, and
    /// [`ValidationError::DuplicateSwitch`] if a name is already present.
    #[tracing::instrument(skip_all, fields(count = switches.len()))]
    pub async fn load(&self, switches: &SwitchesSpec) -> Result<(), SunswitchError> {
        let definitions = switches
            .iter()
            .map(|(name, spec)| SwitchDefinition::try_from(spec).map(|def| (name, def)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut inner = self.inner.lock().await;
        if let Some((name, _)) = definitions
            .iter()
            .find(|(name, _)| inner.switches.contains_key(name.as_str()))
        {
            return Err(ValidationError::DuplicateSwitch {
                name: (*name).clone(),
            }
            .into());
        }

        for (name, definition) in definitions {
            let on_value = definition
                .on_value
                .unwrap_or(self.settings.default_on_value);
            let mut state = SwitchState::new(name.clone(), definition.mode, on_value);
            for rule in definition.timers {
                let id = inner.timer_ids.allocate();
                state.timers.push(ScheduledTimer { id, rule });
            }
            tracing::info!(switch = %name, mode = %state.mode, timers = state.timers.len(), "switch loaded");
            inner.switches.insert(name.clone(), state);
        }
        Ok(())
    }

    /// Declarative view of every switch, the inverse of [`Scheduler::load`].
    pub async fn dump(&self) -> SwitchesSpec {
        let inner = self.inner.lock().await;
        inner
            .switches
            .iter()
            .map(|(name, state)| (name.clone(), SwitchSpec::from(state)))
            .collect()
    }

    /// Snapshot of one switch.
    pub async fn switch(&self, name: &str) -> Option<SwitchState> {
        self.inner.lock().await.switches.get(name).cloned()
    }

    /// Snapshot of every switch, ordered by name.
    pub async fn switches(&self) -> Vec<SwitchState> {
        self.inner.lock().await.switches.values().cloned().collect()
    }

    /// The second the scheduler last evaluated (or was created at).
    pub async fn current_second(&self) -> i64 {
        self.inner.lock().await.current_second
    }

    /// Register a new switch without timers.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateSwitch`] if the name is taken.
    #[tracing::instrument(skip(self))]
    pub async fn add_switch(
        &self,
        name: &str,
        mode: SwitchMode,
        on_value: Option<i64>,
    ) -> Result<(), SunswitchError> {
        let mut inner = self.inner.lock().await;
        if inner.switches.contains_key(name) {
            return Err(ValidationError::DuplicateSwitch {
                name: name.to_string(),
            }
            .into());
        }
        let on_value = on_value.unwrap_or(self.settings.default_on_value);
        inner
            .switches
            .insert(name.to_string(), SwitchState::new(name, mode, on_value));
        Ok(())
    }

    /// Change the mode of `switch` and, unless it is now manual, dispatch
    /// its value immediately for the current second.
    ///
    /// The mode is recorded even if resolving the value fails.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Switch`] for an unknown switch, or a solar
    /// computation error when an `auto` switch cannot be resolved.
    #[tracing::instrument(skip(self))]
    pub async fn set_mode(&self, switch: &str, mode: SwitchMode) -> Result<(), SunswitchError> {
        let output = {
            let mut inner = self.inner.lock().await;
            let second = inner.current_second;
            let state = inner
                .switches
                .get_mut(switch)
                .ok_or_else(|| NotFoundError::Switch(switch.to_string()))?;
            state.mode = mode;
            tracing::info!("mode changed");
            match self.instant(second) {
                Some(at) => state.output(
                    &at,
                    &self.site,
                    self.settings.policy,
                    self.settings.off_value,
                )?,
                None => None,
            }
        };

        if let Some(value) = output {
            self.dispatch_all(vec![(switch.to_string(), value)]).await;
        }
        Ok(())
    }

    /// Append `rule` to `switch` and return its new id.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Switch`] for an unknown switch.
    #[tracing::instrument(skip(self, rule), fields(rule = %rule))]
    pub async fn add_timer(&self, switch: &str, rule: TimerRule) -> Result<TimerId, SunswitchError> {
        let mut inner = self.inner.lock().await;
        if !inner.switches.contains_key(switch) {
            return Err(NotFoundError::Switch(switch.to_string()).into());
        }
        let id = inner.timer_ids.allocate();
        if let Some(state) = inner.switches.get_mut(switch) {
            state.timers.push(ScheduledTimer { id, rule });
        }
        tracing::info!(timer = %id, "timer added");
        Ok(id)
    }

    /// Remove the timer with `id` from whichever switch holds it.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Timer`] if no switch has that timer.
    #[tracing::instrument(skip(self))]
    pub async fn remove_timer(&self, id: TimerId) -> Result<(), SunswitchError> {
        let mut inner = self.inner.lock().await;
        let removed = inner
            .switches
            .values_mut()
            .any(|state| state.remove_timer(id));
        if removed {
            tracing::info!("timer removed");
            Ok(())
        } else {
            Err(NotFoundError::Timer(id).into())
        }
    }

    /// Run the evaluation loop. Never returns; drop the future to stop it.
    pub async fn run(&self) {
        let mut second = self.clock.now().timestamp() + 1;
        tracing::info!(
            resolution = self.settings.resolution,
            start = second,
            "scheduler running"
        );
        loop {
            let delta_ms = second * 1_000 - self.clock.now().timestamp_millis();
            if delta_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delta_ms.unsigned_abs())).await;
            }
            self.step(second).await;
            second += 1;
        }
    }

    /// One loop iteration: record `second` and evaluate if it falls on the
    /// resolution grid.
    pub async fn step(&self, second: i64) {
        self.inner.lock().await.current_second = second;
        if second.rem_euclid(i64::from(self.settings.resolution)) == 0 {
            self.tick(second).await;
        }
    }

    /// Evaluate every switch for `second` and dispatch the results,
    /// regardless of the resolution grid.
    pub async fn tick(&self, second: i64) {
        let Some(at) = self.instant(second) else {
            tracing::error!(second, "second is out of range, skipping tick");
            return;
        };

        let outputs: Vec<(String, i64)> = {
            let inner = self.inner.lock().await;
            inner
                .switches
                .values()
                .filter_map(|state| {
                    match state.output(&at, &self.site, self.settings.policy, self.settings.off_value)
                    {
                        Ok(output) => output.map(|value| (state.name.clone(), value)),
                        Err(err) => {
                            tracing::error!(switch = %state.name, error = %err, "cannot resolve timers, skipping switch");
                            None
                        }
                    }
                })
                .collect()
        };

        tracing::debug!(second, switches = outputs.len(), "tick");
        self.dispatch_all(outputs).await;
    }

    fn instant(&self, second: i64) -> Option<DateTime<Tz>> {
        instant_at(second, &self.settings.timezone)
    }

    async fn dispatch_all(&self, outputs: Vec<(String, i64)>) {
        let calls = outputs.into_iter().map(|(switch, value)| async move {
            tracing::debug!(%switch, value, "setting switch");
            if let Err(err) = self.device.set_value(&switch, value).await {
                tracing::warn!(
                    switch = %err.switch,
                    value = err.value,
                    error = %err.source,
                    "device dispatch failed"
                );
            }
        });
        futures::future::join_all(calls).await;
    }
}
