//! Declarative switch configuration — the shape switches are loaded from
//! and dumped to.
//!
//! ```toml
//! [porch]
//! mode = "auto"
//! on_value = 255
//!
//! [[porch.timers]]
//! on = { type = "sunset", offset = -1800 }
//! off = { type = "daily", time = "23:00:00" }
//! minimum_duration = 3600
//! ```
//!
//! Specs are plain data; converting them into domain types validates them
//! and reports [`ValidationError::InvalidTimerSpec`] or
//! [`ValidationError::InvalidMode`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::switch::{SwitchMode, SwitchState};
use crate::time::{format_time_of_day, parse_time_of_day};
use crate::timer_rule::{DEFAULT_WEIGHT, TimerRule};
use crate::trigger::Trigger;

/// Switch name → switch spec.
pub type SwitchesSpec = BTreeMap<String, SwitchSpec>;

/// One trigger as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerSpec {
    /// `daily`, `sunrise` or `sunset`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `HH:MM:SS`, required for `daily`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Signed seconds, required for `sunrise` and `sunset`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

/// One timer as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimerSpec {
    pub on: TriggerSpec,
    pub off: TriggerSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

/// One switch as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchSpec {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_value: Option<i64>,
    #[serde(default)]
    pub timers: Vec<TimerSpec>,
}

/// A validated [`SwitchSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchDefinition {
    pub mode: SwitchMode,
    pub on_value: Option<i64>,
    pub timers: Vec<TimerRule>,
}

impl TryFrom<&TriggerSpec> for Trigger {
    type Error = ValidationError;

    fn try_from(spec: &TriggerSpec) -> Result<Self, Self::Error> {
        match spec.kind.as_str() {
            "daily" => {
                if spec.offset.is_some() {
                    return Err(ValidationError::timer_spec(
                        "daily trigger does not take an offset",
                    ));
                }
                let time = spec
                    .time
                    .as_deref()
                    .ok_or_else(|| ValidationError::timer_spec("daily trigger needs a time"))?;
                let time_of_day = parse_time_of_day(time).ok_or_else(|| {
                    ValidationError::timer_spec(format!("malformed time {time:?}, expected HH:MM:SS"))
                })?;
                Ok(Self::Daily { time_of_day })
            }
            "sunrise" => Ok(Self::SunriseRelative {
                offset_seconds: offset_of(spec)?,
            }),
            "sunset" => Ok(Self::SunsetRelative {
                offset_seconds: offset_of(spec)?,
            }),
            other => Err(ValidationError::timer_spec(format!(
                "unknown trigger type {other:?}"
            ))),
        }
    }
}

fn offset_of(spec: &TriggerSpec) -> Result<i32, ValidationError> {
    if spec.time.is_some() {
        return Err(ValidationError::timer_spec(format!(
            "{} trigger does not take a time",
            spec.kind
        )));
    }
    let offset = spec.offset.ok_or_else(|| {
        ValidationError::timer_spec(format!("{} trigger needs an offset", spec.kind))
    })?;
    i32::try_from(offset)
        .map_err(|_| ValidationError::timer_spec(format!("offset {offset} is out of range")))
}

impl From<&Trigger> for TriggerSpec {
    fn from(trigger: &Trigger) -> Self {
        match *trigger {
            Trigger::Daily { time_of_day } => Self {
                kind: "daily".to_string(),
                time: Some(format_time_of_day(time_of_day)),
                offset: None,
            },
            Trigger::SunriseRelative { offset_seconds } => Self {
                kind: "sunrise".to_string(),
                time: None,
                offset: Some(i64::from(offset_seconds)),
            },
            Trigger::SunsetRelative { offset_seconds } => Self {
                kind: "sunset".to_string(),
                time: None,
                offset: Some(i64::from(offset_seconds)),
            },
        }
    }
}

impl TryFrom<&TimerSpec> for TimerRule {
    type Error = ValidationError;

    fn try_from(spec: &TimerSpec) -> Result<Self, Self::Error> {
        Ok(Self {
            on: Trigger::try_from(&spec.on)?,
            off: Trigger::try_from(&spec.off)?,
            minimum_duration_seconds: spec.minimum_duration,
            weight: spec.weight.unwrap_or(DEFAULT_WEIGHT),
        })
    }
}

impl From<&TimerRule> for TimerSpec {
    fn from(rule: &TimerRule) -> Self {
        Self {
            on: TriggerSpec::from(&rule.on),
            off: TriggerSpec::from(&rule.off),
            minimum_duration: rule.minimum_duration_seconds,
            weight: (rule.weight != DEFAULT_WEIGHT).then_some(rule.weight),
        }
    }
}

impl TryFrom<&SwitchSpec> for SwitchDefinition {
    type Error = ValidationError;

    fn try_from(spec: &SwitchSpec) -> Result<Self, Self::Error> {
        Ok(Self {
            mode: spec.mode.parse()?,
            on_value: spec.on_value,
            timers: spec
                .timers
                .iter()
                .map(TimerRule::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl From<&SwitchState> for SwitchSpec {
    fn from(state: &SwitchState) -> Self {
        Self {
            mode: state.mode.to_string(),
            on_value: Some(state.on_value),
            timers: state
                .timers
                .iter()
                .map(|timer| TimerSpec::from(&timer.rule))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn daily(time: &str) -> TriggerSpec {
        TriggerSpec {
            kind: "daily".to_string(),
            time: Some(time.to_string()),
            offset: None,
        }
    }

    fn sun(kind: &str, offset: i64) -> TriggerSpec {
        TriggerSpec {
            kind: kind.to_string(),
            time: None,
            offset: Some(offset),
        }
    }

    fn reason(err: ValidationError) -> String {
        match err {
            ValidationError::InvalidTimerSpec { reason } => reason,
            other => panic!("expected InvalidTimerSpec, got {other:?}"),
        }
    }

    #[test]
    fn should_parse_every_trigger_type() {
        assert_eq!(
            Trigger::try_from(&daily("06:45:00")).unwrap(),
            Trigger::Daily {
                time_of_day: NaiveTime::from_hms_opt(6, 45, 0).unwrap()
            }
        );
        assert_eq!(
            Trigger::try_from(&sun("sunrise", -900)).unwrap(),
            Trigger::SunriseRelative {
                offset_seconds: -900
            }
        );
        assert_eq!(
            Trigger::try_from(&sun("sunset", 600)).unwrap(),
            Trigger::SunsetRelative {
                offset_seconds: 600
            }
        );
    }

    #[test]
    fn should_reject_unknown_trigger_type() {
        let err = Trigger::try_from(&sun("moonrise", 0)).unwrap_err();
        assert_eq!(reason(err), "unknown trigger type \"moonrise\"");
    }

    #[test]
    fn should_reject_malformed_daily_time() {
        let err = Trigger::try_from(&daily("7pm")).unwrap_err();
        assert!(reason(err).contains("malformed time"));
    }

    #[test]
    fn should_reject_missing_fields() {
        let mut spec = daily("07:00:00");
        spec.time = None;
        assert!(reason(Trigger::try_from(&spec).unwrap_err()).contains("needs a time"));

        let mut spec = sun("sunset", 0);
        spec.offset = None;
        assert!(reason(Trigger::try_from(&spec).unwrap_err()).contains("needs an offset"));
    }

    #[test]
    fn should_reject_fields_that_do_not_apply_to_the_trigger() {
        let mut spec = daily("07:00:00");
        spec.offset = Some(5);
        assert!(reason(Trigger::try_from(&spec).unwrap_err()).contains("does not take an offset"));

        let mut spec = sun("sunrise", 0);
        spec.time = Some("07:00:00".to_string());
        assert!(reason(Trigger::try_from(&spec).unwrap_err()).contains("does not take a time"));
    }

    #[test]
    fn should_reject_misspelled_timer_field() {
        let toml = r#"
            [porch]
            mode = "auto"

            [[porch.timers]]
            on = { type = "daily", time = "10:00:00" }
            off = { type = "daily", time = "10:00:05" }
            minimum_duraton = 10
        "#;
        let err = toml::from_str::<SwitchesSpec>(toml).unwrap_err();
        assert!(err.to_string().contains("minimum_duraton"));
    }

    #[test]
    fn should_reject_unknown_trigger_and_switch_fields() {
        let toml = r#"
            [porch]
            mode = "auto"

            [[porch.timers]]
            on = { type = "sunset", offset = 0, when = "later" }
            off = { type = "daily", time = "23:00:00" }
        "#;
        assert!(toml::from_str::<SwitchesSpec>(toml).is_err());

        let toml = r#"
            [porch]
            mode = "auto"
            on_valu = 80
        "#;
        assert!(toml::from_str::<SwitchesSpec>(toml).is_err());
    }

    #[test]
    fn should_reject_out_of_range_offset() {
        let err = Trigger::try_from(&sun("sunrise", i64::from(i32::MAX) + 1)).unwrap_err();
        assert!(reason(err).contains("out of range"));
    }

    #[test]
    fn should_default_weight_and_omit_it_when_dumping() {
        let spec = TimerSpec {
            on: daily("08:00:00"),
            off: daily("09:00:00"),
            minimum_duration: None,
            weight: None,
        };
        let rule = TimerRule::try_from(&spec).unwrap();
        assert_eq!(rule.weight, DEFAULT_WEIGHT);
        assert_eq!(TimerSpec::from(&rule), spec);
    }

    #[test]
    fn should_reject_invalid_mode_in_switch_spec() {
        let spec = SwitchSpec {
            mode: "sometimes".to_string(),
            on_value: None,
            timers: vec![],
        };
        assert!(matches!(
            SwitchDefinition::try_from(&spec),
            Err(ValidationError::InvalidMode { .. })
        ));
    }

    #[test]
    fn should_roundtrip_every_variant_through_specs() {
        let rules = [
            TimerRule::new(
                Trigger::Daily {
                    time_of_day: NaiveTime::from_hms_opt(22, 30, 5).unwrap(),
                },
                Trigger::SunriseRelative {
                    offset_seconds: -1_200,
                },
            ),
            TimerRule::new(
                Trigger::SunsetRelative {
                    offset_seconds: 300,
                },
                Trigger::Daily {
                    time_of_day: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
                },
            )
            .with_minimum_duration(1_800)
            .with_weight(-3),
        ];
        for rule in &rules {
            let spec = TimerSpec::from(rule);
            assert_eq!(&TimerRule::try_from(&spec).unwrap(), rule);
        }
    }

    #[test]
    fn should_deserialize_switches_from_toml() {
        let toml = r#"
            [porch]
            mode = "auto"

            [[porch.timers]]
            on = { type = "sunset", offset = -1800 }
            off = { type = "daily", time = "23:00:00" }
            minimum_duration = 3600

            [heater]
            mode = "manual"
            on_value = 99
        "#;
        let switches: SwitchesSpec = toml::from_str(toml).unwrap();
        assert_eq!(switches.len(), 2);

        let porch = SwitchDefinition::try_from(&switches["porch"]).unwrap();
        assert_eq!(porch.mode, SwitchMode::Auto);
        assert_eq!(porch.timers.len(), 1);
        assert_eq!(porch.timers[0].minimum_duration_seconds, Some(3_600));

        let heater = SwitchDefinition::try_from(&switches["heater"]).unwrap();
        assert_eq!(heater.mode, SwitchMode::Manual);
        assert_eq!(heater.on_value, Some(99));
        assert!(heater.timers.is_empty());
    }

    #[test]
    fn should_serialize_spec_without_empty_fields() {
        let json = serde_json::to_value(sun("sunrise", 60)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "sunrise", "offset": 60}));
    }
}
