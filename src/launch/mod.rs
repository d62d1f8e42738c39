//! Launch-configuration synthesis from catalogue install descriptors.
//!
//! Install descriptors are free-form text (`npm install @scope/pkg`,
//! `docker run -i --rm image`) or explicit `{command, args}` pairs. This
//! context is the only place that inspects that text; everything else works
//! with [`domain::ParsedDescriptor`] and [`domain::LaunchConfiguration`].
//! Synthesis is pure, so the context has no ports or adapters.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
