//! Physics-lite for the shooter: straight-line motion, elastic wall bounces
//! and equal-mass circle collisions. Velocities are px per second.

use serde::Serialize;

/// Config speeds are px per 60 Hz frame; multiply by this for px/s.
pub const FRAME_RATE: f64 = 60.0;
/// Strip at the bottom of the area kept clear for the turret.
pub const TURRET_RESERVE: f64 = 50.0;
pub const BULLET_RADIUS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayArea {
    pub width: f64,
    pub height: f64,
}

impl PlayArea {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Lowest y a body may reach.
    #[inline]
    pub fn floor(&self) -> f64 {
        self.height - TURRET_RESERVE
    }

    #[inline]
    pub fn turret(&self) -> (f64, f64) {
        (self.width / 2.0, self.height - 20.0)
    }

    /// Bullets survive up to 10 px past the edges.
    #[inline]
    pub fn contains_with_margin(&self, x: f64, y: f64) -> bool {
        (-10.0..=self.width + 10.0).contains(&x) && (-10.0..=self.height + 10.0).contains(&y)
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub radius: f64,
}

impl Body {
    #[inline]
    pub fn speed(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

#[inline]
pub fn circles_overlap(x1: f64, y1: f64, r1: f64, x2: f64, y2: f64, r2: f64) -> bool {
    (x2 - x1).hypot(y2 - y1) < r1 + r2
}

/// Advance one body by `dt` seconds, reflecting off the area walls and
/// clamping it back inside.
pub fn step_body(body: &mut Body, area: &PlayArea, dt: f64) {
    let mut nx = body.x + body.dx * dt;
    let mut ny = body.y + body.dy * dt;

    if nx - body.radius < 0.0 {
        nx = body.radius;
        body.dx = body.dx.abs();
    } else if nx + body.radius > area.width {
        nx = area.width - body.radius;
        body.dx = -body.dx.abs();
    }
    if ny - body.radius < 0.0 {
        ny = body.radius;
        body.dy = body.dy.abs();
    } else if ny + body.radius > area.floor() {
        ny = area.floor() - body.radius;
        body.dy = -body.dy.abs();
    }

    body.x = nx;
    body.y = ny;
}

/// Resolve an overlap between two equal-mass bodies. When they are closing
/// along the line of centers the normal velocity components are exchanged;
/// either way each is pushed out by half the overlap. Returns whether the
/// bodies were overlapping.
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> bool {
    let ddx = b.x - a.x;
    let ddy = b.y - a.y;
    let dist = ddx.hypot(ddy);
    let min_dist = a.radius + b.radius;
    if !(dist < min_dist && dist > 0.0) {
        return false;
    }

    let nx = ddx / dist;
    let ny = ddy / dist;

    let dvn = (a.dx - b.dx) * nx + (a.dy - b.dy) * ny;
    if dvn > 0.0 {
        a.dx -= dvn * nx;
        a.dy -= dvn * ny;
        b.dx += dvn * nx;
        b.dy += dvn * ny;
    }

    let half = (min_dist - dist) / 2.0;
    a.x -= nx * half;
    a.y -= ny * half;
    b.x += nx * half;
    b.y += ny * half;
    true
}

/// Pairwise collision pass over every body for which `active` holds.
pub fn resolve_collisions<T, A, B>(items: &mut [T], active: A, body: B)
where
    A: Fn(&T) -> bool,
    B: Fn(&mut T) -> &mut Body,
{
    for i in 0..items.len() {
        let (head, tail) = items.split_at_mut(i + 1);
        let a = &mut head[i];
        if !active(&*a) {
            continue;
        }
        for b in tail.iter_mut() {
            if !active(&*b) {
                continue;
            }
            resolve_pair(body(&mut *a), body(&mut *b));
        }
    }
}
