/// Point light: emittable capability exposed to programs as a uniform struct.

use std::fmt;
use glam::{Vec3, Vec4};
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::render::{UniformStruct, UniformVariable};
use super::capability::{impl_capability, CapabilityKind, UpdateContext};

/// Name of the uniform struct array point lights are written to
pub const POINT_LIGHT_UNIFORM: &str = "u_PointLights";

/// Name of the uniform holding the number of point lights
pub const POINT_LIGHT_COUNT_UNIFORM: &str = "u_NumPointLights";

/// Omnidirectional light positioned at its node
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    power: Vec3,
    color: Vec4,
}

/// GPU-side layout of a point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightUniform {
    pub position: Vec3,
    pub power: Vec3,
    pub color: Vec4,
}

impl UniformStruct for PointLightUniform {
    fn uniform_members(&self) -> Vec<(&'static str, UniformVariable)> {
        vec![
            ("Position", self.position.into()),
            ("Power", self.power.into()),
            ("Color", self.color.into()),
        ]
    }
}

impl PointLight {
    /// `color` components are clamped to `[0, 1]`
    pub fn new(power: Vec3, color: Vec4) -> Self {
        Self {
            power,
            color: color.clamp(Vec4::ZERO, Vec4::ONE),
        }
    }

    pub fn power(&self) -> Vec3 {
        self.power
    }

    pub fn set_power(&mut self, power: Vec3) {
        self.power = power;
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color.clamp(Vec4::ZERO, Vec4::ONE);
    }

    /// Uniform struct of this light placed at `position`
    pub fn to_uniform(&self, position: Vec3) -> PointLightUniform {
        PointLightUniform {
            position,
            power: self.power,
            color: self.color,
        }
    }

    /// Write `u_PointLights[index].*` into `map`
    pub fn to_uniform_map(&self, position: Vec3, index: usize, map: &mut FxHashMap<String, UniformVariable>) {
        self.to_uniform(position)
            .to_uniform_map(POINT_LIGHT_UNIFORM, Some(index), map);
    }

    fn update_capability(&mut self, _ctx: &mut UpdateContext<'_>) -> Result<()> {
        Ok(())
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::ONE, Vec4::ONE)
    }
}

impl_capability!(PointLight, CapabilityKind::Emittable);

impl fmt::Display for PointLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointLight[power = {}, color = {}]", self.power, self.color)
    }
}

#[cfg(test)]
#[path = "point_light_tests.rs"]
mod tests;
