use std::sync::atomic::{AtomicI32, Ordering};

use crate::component::{Component, Lineage};

// Test component summary:
// Position, Velocity: plain components without supertypes
// Counter: mutable through an atomic
// Shape <- Circle <- Ring: a three-level lineage
// CompN<N>: a family of distinct plain types for arity tests

#[derive(Debug, PartialEq)]
pub struct Position(pub i32);
impl Component for Position {}

#[derive(Debug, PartialEq)]
pub struct Velocity(pub i32);
impl Component for Velocity {}

/// A component mutated in place.
#[derive(Debug, Default)]
pub struct Counter(pub AtomicI32);
impl Component for Counter {}

impl Counter {
    pub fn new(value: i32) -> Self { Self(AtomicI32::new(value)) }

    pub fn get(&self) -> i32 { self.0.load(Ordering::SeqCst) }

    pub fn add(&self, delta: i32) { self.0.fetch_add(delta, Ordering::SeqCst); }
}

/// The root of the test lineage.
#[derive(Debug)]
pub struct Shape {
    pub label: &'static str,
}
impl Component for Shape {}

/// Extends [`Shape`].
#[derive(Debug)]
pub struct Circle {
    pub shape:  Shape,
    pub radius: u32,
}
impl Component for Circle {
    fn lineage(lineage: &mut Lineage<Self>) { lineage.extends::<Shape>(|circle| &circle.shape); }
}

/// Extends [`Circle`], and [`Shape`] transitively.
#[derive(Debug)]
pub struct Ring {
    pub circle: Circle,
    pub inner:  u32,
}
impl Component for Ring {
    fn lineage(lineage: &mut Lineage<Self>) { lineage.extends::<Circle>(|ring| &ring.circle); }
}

impl Shape {
    pub fn new(label: &'static str) -> Self { Self { label } }
}

impl Circle {
    pub fn new(label: &'static str, radius: u32) -> Self { Self { shape: Shape::new(label), radius } }
}

impl Ring {
    pub fn new(label: &'static str, radius: u32, inner: u32) -> Self {
        Self { circle: Circle::new(label, radius), inner }
    }
}

/// a generic component
#[derive(Debug, PartialEq)]
pub struct CompN<const N: usize>(pub i32);
impl<const N: usize> Component for CompN<N> {}
