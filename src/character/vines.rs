//! Character domain: climbable vines.
//!
//! A vine is a polyline with a sway offset that peaks at its middle. Positions
//! along a vine are normalized arc lengths in [0, 1].

use std::f32::consts::PI;

use bevy::prelude::*;

use crate::character::VinePosition;

/// Extra distance beyond the body radius within which a neighbouring vine can be grabbed.
const SWITCH_REACH: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct Vine {
    points: Vec<Vec2>,
    /// Cumulative arc length at each point
    arc: Vec<f32>,
    pub sway: Vec2,
}

impl Vine {
    pub fn new(points: Vec<Vec2>) -> Self {
        let mut arc = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                total += point.distance(points[i - 1]);
            }
            arc.push(total);
        }
        Self {
            points,
            arc,
            sway: Vec2::ZERO,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn total_length(&self) -> f32 {
        self.arc.last().copied().unwrap_or(0.0)
    }

    /// Segment index and the fraction along it for a normalized position.
    fn locate(&self, t: f32) -> (usize, f32) {
        if self.points.len() < 2 {
            return (0, 0.0);
        }
        let target = t.clamp(0.0, 1.0) * self.total_length();
        for segment in 0..self.points.len() - 1 {
            let (start, end) = (self.arc[segment], self.arc[segment + 1]);
            if target <= end || segment == self.points.len() - 2 {
                let len = end - start;
                let frac = if len > 0.0 { (target - start) / len } else { 0.0 };
                return (segment, frac.clamp(0.0, 1.0));
            }
        }
        (self.points.len() - 2, 1.0)
    }

    pub fn point_at(&self, t: f32) -> Vec2 {
        let base = match self.points.len() {
            0 => Vec2::ZERO,
            1 => self.points[0],
            _ => {
                let (segment, frac) = self.locate(t);
                self.points[segment].lerp(self.points[segment + 1], frac)
            }
        };
        base + self.sway * (PI * t.clamp(0.0, 1.0)).sin()
    }

    pub fn tangent_at(&self, t: f32) -> Vec2 {
        if self.points.len() < 2 {
            return Vec2::ZERO;
        }
        let (segment, _) = self.locate(t);
        (self.points[segment + 1] - self.points[segment]).normalize_or_zero()
    }

    /// Closest position on the vine to `point`: (normalized position, world point).
    pub fn closest(&self, point: Vec2) -> (f32, Vec2) {
        let total = self.total_length();
        if self.points.len() < 2 || total <= 0.0 {
            let p = self.points.first().copied().unwrap_or(Vec2::ZERO);
            return (0.0, p);
        }

        let mut best = (0.0, self.point_at(0.0), f32::MAX);
        for segment in 0..self.points.len() - 1 {
            let (a, b) = (self.points[segment], self.points[segment + 1]);
            let ab = b - a;
            let frac = if ab.length_squared() > 0.0 {
                ((point - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t = (self.arc[segment] + frac * ab.length()) / total;
            let on_vine = self.point_at(t);
            let dist = on_vine.distance(point);
            if dist < best.2 {
                best = (t, on_vine, dist);
            }
        }
        (best.0, best.1)
    }
}

/// All vines in the world.
#[derive(Resource, Debug, Clone, Default)]
pub struct VineNetwork {
    vines: Vec<Vine>,
}

impl VineNetwork {
    pub fn add(&mut self, vine: Vine) -> usize {
        self.vines.push(vine);
        self.vines.len() - 1
    }

    pub fn vines(&self) -> &[Vine] {
        &self.vines
    }

    pub fn on_vine_pos(&self, pos: VinePosition) -> Vec2 {
        self.vines
            .get(pos.vine)
            .map(|vine| vine.point_at(pos.float_pos))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn total_length(&self, vine: usize) -> f32 {
        self.vines.get(vine).map_or(0.0, Vine::total_length)
    }

    /// Signed climbing speed toward `goal`, in [-1, 1]: how well the vine's
    /// direction at `pos` lines up with the direction to the goal.
    pub fn climb_on_vine_speed(&self, pos: VinePosition, goal: Vec2) -> f32 {
        let Some(vine) = self.vines.get(pos.vine) else {
            return 0.0;
        };
        let to_goal = (goal - vine.point_at(pos.float_pos)).normalize_or_zero();
        vine.tangent_at(pos.float_pos).dot(to_goal)
    }

    pub fn push_at_vine(&mut self, pos: VinePosition, push: Vec2) {
        if let Some(vine) = self.vines.get_mut(pos.vine) {
            let weight = (PI * pos.float_pos.clamp(0.0, 1.0)).sin().max(0.1);
            vine.sway += push / weight;
        }
    }

    /// A neighbouring vine close enough to `pos` that gets nearer to `goal`.
    pub fn vine_switch(&self, pos: VinePosition, goal: Vec2, rad: f32) -> Option<VinePosition> {
        let here = self.on_vine_pos(pos);
        let mut best_dist = here.distance(goal);
        let mut best = None;

        for (index, vine) in self.vines.iter().enumerate() {
            if index == pos.vine {
                continue;
            }
            let (_, near_here) = vine.closest(here);
            if near_here.distance(here) > rad + SWITCH_REACH {
                continue;
            }
            let (t, near_goal) = vine.closest(goal);
            let dist = near_goal.distance(goal);
            if dist < best_dist {
                best_dist = dist;
                best = Some(VinePosition {
                    vine: index,
                    float_pos: t,
                });
            }
        }

        best
    }

    /// Closest vine position within `reach` of `point`.
    pub fn nearest(&self, point: Vec2, reach: f32) -> Option<VinePosition> {
        self.vines
            .iter()
            .enumerate()
            .map(|(index, vine)| {
                let (t, on_vine) = vine.closest(point);
                (index, t, on_vine.distance(point))
            })
            .filter(|(_, _, dist)| *dist <= reach)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(vine, float_pos, _)| VinePosition { vine, float_pos })
    }

    /// Let sway settle back toward rest.
    pub fn relax(&mut self, factor: f32) {
        for vine in &mut self.vines {
            vine.sway *= factor;
        }
    }
}
