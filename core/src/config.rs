//! Configuration of layout animations.
//!
//! A [`LayoutAnimationConfig`] is what the scripting runtime asks for when it schedules the next
//! layout change to be animated. It holds up to one [`AnimationConfig`] per [`AnimationPhase`]:
//! how newly inserted nodes enter, how updated nodes move, and how removed nodes exit. Phases
//! without a configuration are applied immediately.

use crate::easing::Easing;
use crate::error::ConfigError;
use crate::view::Appearance;
use enum_map::{Enum, EnumMap};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

const DEFAULT_SPRING_DAMPING: f32 = 0.5;

/// Identifies the progress function of an animation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AnimationType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInEaseOut,
    Keyboard,
    Spring,
}

impl FromStr for AnimationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "easeIn" => Ok(Self::EaseIn),
            "easeOut" => Ok(Self::EaseOut),
            "easeInEaseOut" => Ok(Self::EaseInEaseOut),
            "keyboard" => Ok(Self::Keyboard),
            "spring" => Ok(Self::Spring),
            _ => Err(ConfigError::UnknownAnimationType(s.to_string())),
        }
    }
}

/// The appearance property that enter and exit animations fade or shrink.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AnimationProperty {
    #[default]
    Opacity,
    ScaleX,
    ScaleY,
    ScaleXY,
}

impl AnimationProperty {
    /// Returns `appearance` with this property set to zero, i.e. the state a node enters from or
    /// exits to.
    pub fn collapse(&self, appearance: Appearance) -> Appearance {
        match self {
            Self::Opacity => Appearance {
                opacity: 0.0,
                ..appearance
            },
            Self::ScaleX => Appearance {
                scale_x: 0.0,
                ..appearance
            },
            Self::ScaleY => Appearance {
                scale_y: 0.0,
                ..appearance
            },
            Self::ScaleXY => Appearance {
                scale_x: 0.0,
                scale_y: 0.0,
                ..appearance
            },
        }
    }
}

impl FromStr for AnimationProperty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opacity" => Ok(Self::Opacity),
            "scaleX" => Ok(Self::ScaleX),
            "scaleY" => Ok(Self::ScaleY),
            "scaleXY" => Ok(Self::ScaleXY),
            _ => Err(ConfigError::UnknownAnimationProperty(s.to_string())),
        }
    }
}

/// Which kind of change an [`AnimationConfig`] applies to.
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub enum AnimationPhase {
    /// Nodes inserted into the tree.
    Create,
    /// Nodes whose snapshot changed while mounted.
    Update,
    /// Nodes removed from the tree.
    Delete,
}

impl AnimationPhase {
    fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Timing and curve for one [`AnimationPhase`]. Times are in milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    pub animation_type: AnimationType,
    pub property: AnimationProperty,
    pub duration: f32,
    pub delay: f32,
    pub spring_damping: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            animation_type: AnimationType::default(),
            property: AnimationProperty::default(),
            duration: 0.0,
            delay: 0.0,
            spring_damping: DEFAULT_SPRING_DAMPING,
        }
    }
}

impl AnimationConfig {
    pub fn new(animation_type: AnimationType, duration: f32) -> Self {
        Self {
            animation_type,
            duration,
            ..Default::default()
        }
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn property(mut self, property: AnimationProperty) -> Self {
        self.property = property;
        self
    }

    pub fn spring_damping(mut self, spring_damping: f32) -> Self {
        self.spring_damping = spring_damping;
        self
    }

    /// Gets the progress function for this configuration.
    pub fn easing(&self) -> Easing {
        match self.animation_type {
            AnimationType::Linear => Easing::Linear,
            AnimationType::EaseIn => Easing::EaseIn,
            AnimationType::EaseOut => Easing::EaseOut,
            AnimationType::EaseInEaseOut => Easing::EaseInEaseOut,
            AnimationType::Keyboard => Easing::Keyboard,
            AnimationType::Spring => Easing::Spring {
                damping: self.spring_damping,
            },
        }
    }
}

/// One user-requested layout animation: an overall duration plus per-phase settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutAnimationConfig {
    pub duration: f32,
    phases: EnumMap<AnimationPhase, Option<AnimationConfig>>,
}

impl LayoutAnimationConfig {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            phases: EnumMap::default(),
        }
    }

    /// Configures the animation for a given `phase`, replacing any previous configuration for the
    /// same phase.
    pub fn on(mut self, phase: AnimationPhase, config: AnimationConfig) -> Self {
        self.phases[phase] = Some(config);
        self
    }

    pub fn get(&self, phase: AnimationPhase) -> Option<&AnimationConfig> {
        self.phases[phase].as_ref()
    }

    /// Reads a configuration document, substituting defaults for anything missing or invalid.
    ///
    /// Every problem is logged. A document that cannot be read at all produces a configuration
    /// that animates nothing; a phase with an unusable duration animates instantly.
    pub fn from_raw(raw: &Value) -> Self {
        let document = match RawLayoutAnimationConfig::deserialize(raw) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!("{}; no layout animation will run", ConfigError::from(err));
                return Self::default();
            }
        };
        let (config, errors) = document.resolve();
        for err in errors {
            tracing::warn!("{err}; using default");
        }
        config
    }

    /// Reads a configuration document, failing on the first problem found.
    pub fn try_from_raw(raw: &Value) -> Result<Self, ConfigError> {
        let document = RawLayoutAnimationConfig::deserialize(raw)?;
        let (config, errors) = document.resolve();
        match errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(config),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLayoutAnimationConfig {
    duration: Option<f64>,
    create: Option<RawAnimationConfig>,
    update: Option<RawAnimationConfig>,
    delete: Option<RawAnimationConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnimationConfig {
    #[serde(rename = "type")]
    animation_type: Option<String>,
    property: Option<String>,
    duration: Option<f64>,
    delay: Option<f64>,
    spring_damping: Option<f64>,
}

impl RawLayoutAnimationConfig {
    fn resolve(self) -> (LayoutAnimationConfig, Vec<ConfigError>) {
        let mut errors = Vec::new();
        let duration = match self.duration {
            Some(value) => timing("duration", value, &mut errors),
            None => None,
        };
        let mut config = LayoutAnimationConfig::new(duration.unwrap_or(0.0));
        let sections = [
            (AnimationPhase::Create, self.create),
            (AnimationPhase::Update, self.update),
            (AnimationPhase::Delete, self.delete),
        ];
        for (phase, section) in sections {
            if let Some(section) = section {
                config.phases[phase] = Some(section.resolve(phase, duration, &mut errors));
            }
        }
        (config, errors)
    }
}

impl RawAnimationConfig {
    fn resolve(
        self,
        phase: AnimationPhase,
        default_duration: Option<f32>,
        errors: &mut Vec<ConfigError>,
    ) -> AnimationConfig {
        let mut config = AnimationConfig::default();
        if let Some(name) = self.animation_type {
            match name.parse() {
                Ok(animation_type) => config.animation_type = animation_type,
                Err(err) => errors.push(err),
            }
        }
        if let Some(name) = self.property {
            match name.parse() {
                Ok(property) => config.property = property,
                Err(err) => errors.push(err),
            }
        }
        match self.duration {
            Some(value) => {
                if let Some(duration) = timing("duration", value, errors) {
                    config.duration = duration;
                }
            }
            None => match default_duration {
                Some(duration) => config.duration = duration,
                None => errors.push(ConfigError::MissingDuration(phase.name())),
            },
        }
        if let Some(delay) = self.delay.and_then(|value| timing("delay", value, errors)) {
            config.delay = delay;
        }
        if let Some(damping) = self.spring_damping {
            if damping.is_finite() && damping > 0.0 {
                config.spring_damping = damping as f32;
            } else {
                errors.push(ConfigError::InvalidTiming {
                    field: "springDamping",
                    value: damping,
                });
            }
        }
        config
    }
}

fn timing(field: &'static str, value: f64, errors: &mut Vec<ConfigError>) -> Option<f32> {
    if value.is_finite() && value >= 0.0 {
        Some(value as f32)
    } else {
        errors.push(ConfigError::InvalidTiming { field, value });
        None
    }
}
