//! The vehicle-level performance network.

use crate::cache::{CacheEntry, CacheKey, CacheReader, ResultCache};
use crate::distributor::{CommitReport, EnergyDistributor};
use crate::error::{NetworkError, NetworkResult};
use crate::fingerprint::structural_fingerprint;
use nalgebra::Vector3;
use pn_assembly::{
    OperatingConditions, PerformanceResult, PropulsorAssembly, UnknownsResiduals,
};
use pn_core::units::{Force, Power, newtons, watts};
use pn_core::{AssemblyId, DistributorId};
use pn_flow::Freestream;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Conditions the mission-segment solver supplies for one control point.
#[derive(Debug, Clone, Copy)]
pub struct ControlPoint {
    pub index: usize,
    pub freestream: Freestream,
    pub throttle: f64,
    pub pitch_command: f64,
    /// Time spent at this point, used when committing energy (s).
    pub dt_s: f64,
}

impl ControlPoint {
    pub fn new(index: usize, freestream: Freestream) -> Self {
        Self {
            index,
            freestream,
            throttle: 1.0,
            pitch_command: 0.0,
            dt_s: 0.0,
        }
    }

    pub fn with_throttle(self, throttle: f64) -> Self {
        Self { throttle, ..self }
    }

    pub fn with_pitch_command(self, pitch_command: f64) -> Self {
        Self {
            pitch_command,
            ..self
        }
    }

    pub fn with_dt(self, dt_s: f64) -> Self {
        Self { dt_s, ..self }
    }
}

/// How an assembly takes part in an evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Evaluated on its own; no identical partners.
    Unique,
    /// Evaluated and published for its peers.
    Canonical,
    /// Reuses the result of the canonical member of its group.
    Peer { canonical: AssemblyId },
    Inactive,
}

impl Role {
    pub fn evaluates(self) -> bool {
        matches!(self, Role::Unique | Role::Canonical)
    }
}

#[derive(Debug, Clone)]
struct Member {
    fingerprint: String,
    role: Role,
}

/// An unknown exposed to the outer solver, with its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownSlot {
    pub distributor: DistributorId,
    pub assembly: AssemblyId,
    pub tag: String,
    pub name: &'static str,
    pub initial_guess: f64,
}

#[derive(Debug, Clone)]
pub struct AssemblyReport {
    pub distributor: DistributorId,
    pub tag: String,
    pub role: Role,
    pub result: PerformanceResult,
}

/// Outcome of one full pass over the network.
#[derive(Debug, Clone)]
pub struct NetworkEvaluation {
    pub control_point: usize,
    /// Residuals in the order of [`PerformanceNetwork::unknowns`].
    pub residuals: Vec<f64>,
    pub reports: Vec<AssemblyReport>,
    pub cache_hits: usize,
}

impl NetworkEvaluation {
    pub fn total_thrust(&self) -> Vector3<f64> {
        self.reports
            .iter()
            .fold(Vector3::zeros(), |acc, r| acc + r.result.thrust())
    }

    pub fn total_moment(&self) -> Vector3<f64> {
        self.reports
            .iter()
            .fold(Vector3::zeros(), |acc, r| acc + r.result.moment)
    }

    pub fn total_power_w(&self) -> f64 {
        self.reports.iter().map(|r| r.result.power_w()).sum()
    }

    /// Magnitude of the summed thrust vector.
    pub fn net_thrust(&self) -> Force {
        newtons(self.total_thrust().norm())
    }

    pub fn total_power(&self) -> Power {
        watts(self.total_power_w())
    }

    pub fn residual_norm(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum::<f64>().sqrt()
    }

    pub fn report(&self, tag: &str) -> Option<&AssemblyReport> {
        self.reports.iter().find(|r| r.tag == tag)
    }
}

/// Distributors of one vehicle plus the bookkeeping for result reuse.
#[derive(Debug, Clone)]
pub struct PerformanceNetwork {
    name: String,
    center_of_gravity: Vector3<f64>,
    distributors: Vec<EnergyDistributor>,
    layout: Vec<Vec<Member>>,
    unknowns: Vec<UnknownSlot>,
}

fn assign_roles(distributor: &EnergyDistributor) -> NetworkResult<Vec<Member>> {
    let mut members = Vec::with_capacity(distributor.propulsors().len());
    let mut first_of: HashMap<String, usize> = HashMap::new();
    let mut group_size: HashMap<String, usize> = HashMap::new();

    for (i, p) in distributor.propulsors().iter().enumerate() {
        let fingerprint = structural_fingerprint(p)?;
        let role = if !p.is_active() {
            Role::Inactive
        } else if !p.is_identical() {
            Role::Unique
        } else {
            *group_size.entry(fingerprint.clone()).or_default() += 1;
            match first_of.get(&fingerprint) {
                Some(&canonical) => Role::Peer {
                    canonical: AssemblyId::from_usize(canonical),
                },
                None => {
                    first_of.insert(fingerprint.clone(), i);
                    Role::Canonical
                }
            }
        };
        members.push(Member { fingerprint, role });
    }

    // A lone identical propulsor has nobody to share with.
    for (m, p) in members.iter_mut().zip(distributor.propulsors()) {
        if m.role == Role::Canonical && group_size.get(&m.fingerprint) == Some(&1) {
            warn!(
                distributor = %distributor.tag(),
                assembly = %p.tag(),
                "flagged identical but no structurally identical partner"
            );
            m.role = Role::Unique;
        }
    }
    Ok(members)
}

impl PerformanceNetwork {
    pub fn new(
        name: impl Into<String>,
        center_of_gravity: Vector3<f64>,
        distributors: Vec<EnergyDistributor>,
    ) -> NetworkResult<Self> {
        let name = name.into();
        let mut tags = HashSet::new();
        for d in &distributors {
            if !tags.insert(d.tag().to_string()) {
                return Err(NetworkError::configuration(
                    &name,
                    format!("duplicate tag '{}'", d.tag()),
                ));
            }
            for p in d.propulsors() {
                if !tags.insert(p.tag().to_string()) {
                    return Err(NetworkError::configuration(
                        &name,
                        format!("duplicate tag '{}'", p.tag()),
                    ));
                }
            }
        }

        let layout = distributors
            .iter()
            .map(assign_roles)
            .collect::<NetworkResult<Vec<_>>>()?;

        let mut unknowns = Vec::new();
        for (d_idx, (d, members)) in distributors.iter().zip(&layout).enumerate() {
            for (p_idx, (p, m)) in d.propulsors().iter().zip(members).enumerate() {
                if !m.role.evaluates() {
                    continue;
                }
                for u in p.declare_unknowns() {
                    unknowns.push(UnknownSlot {
                        distributor: DistributorId::from_usize(d_idx),
                        assembly: AssemblyId::from_usize(p_idx),
                        tag: p.tag().to_string(),
                        name: u.name,
                        initial_guess: u.initial_guess,
                    });
                }
            }
        }

        Ok(Self {
            name,
            center_of_gravity,
            distributors,
            layout,
            unknowns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center_of_gravity(&self) -> &Vector3<f64> {
        &self.center_of_gravity
    }

    pub fn distributors(&self) -> &[EnergyDistributor] {
        &self.distributors
    }

    pub fn distributor(&self, id: DistributorId) -> Option<&EnergyDistributor> {
        self.distributors.get(id.as_usize())
    }

    pub fn assemblies(&self) -> impl Iterator<Item = &PropulsorAssembly> {
        self.distributors.iter().flat_map(|d| d.propulsors())
    }

    pub fn assembly(&self, tag: &str) -> Option<&PropulsorAssembly> {
        self.assemblies().find(|p| p.tag() == tag)
    }

    pub fn role(&self, distributor: DistributorId, assembly: AssemblyId) -> Option<Role> {
        self.layout
            .get(distributor.as_usize())
            .and_then(|ms| ms.get(assembly.as_usize()))
            .map(|m| m.role)
    }

    pub fn fingerprint(&self, distributor: DistributorId, assembly: AssemblyId) -> Option<&str> {
        self.layout
            .get(distributor.as_usize())
            .and_then(|ms| ms.get(assembly.as_usize()))
            .map(|m| m.fingerprint.as_str())
    }

    /// Unknowns of every unique or canonical assembly, in evaluation order.
    pub fn unknowns(&self) -> &[UnknownSlot] {
        &self.unknowns
    }

    pub fn initial_guess(&self) -> Vec<f64> {
        self.unknowns.iter().map(|u| u.initial_guess).collect()
    }

    /// Start a mission segment of `control_points` points.
    pub fn append_conditions(&mut self, control_points: usize) {
        for d in &mut self.distributors {
            d.begin_segment();
            for p in d.propulsors_mut() {
                p.append_conditions(control_points);
            }
        }
    }

    /// Evaluate every active assembly for `trial` at `point`.
    ///
    /// A fresh cache is built for the pass. Canonical members precede their
    /// peers within a distributor, so every read follows its publish.
    pub fn evaluate(
        &mut self,
        point: &ControlPoint,
        trial: &[f64],
    ) -> NetworkResult<NetworkEvaluation> {
        if trial.len() != self.unknowns.len() {
            return Err(NetworkError::InvalidArg {
                what: "trial vector length differs from the unknown count",
            });
        }

        let mut cache = ResultCache::new(point.index);
        let mut residuals = Vec::with_capacity(trial.len());
        let mut reports = Vec::new();
        let mut offset = 0;

        for (d_idx, dist) in self.distributors.iter_mut().enumerate() {
            let distributor = DistributorId::from_usize(d_idx);
            let mut cond = OperatingConditions::new(point.index, point.freestream)
                .with_throttle(point.throttle)
                .with_pitch_command(point.pitch_command)
                .with_center_of_gravity(self.center_of_gravity);
            if let Some(v) = dist.bus_voltage() {
                cond = cond.with_bus_voltage(v);
            }

            for (assembly, member) in dist.propulsors_mut().iter_mut().zip(&self.layout[d_idx]) {
                let key = CacheKey {
                    distributor,
                    fingerprint: member.fingerprint.clone(),
                    control_point: point.index,
                };
                let result = match member.role {
                    Role::Inactive => continue,
                    Role::Peer { .. } => {
                        let core = cache.read(
                            &key,
                            CacheReader {
                                tag: assembly.tag(),
                                identical: assembly.is_identical(),
                                freestream: &point.freestream,
                            },
                        )?;
                        assembly.adopt(core, &cond)?
                    }
                    Role::Unique | Role::Canonical => {
                        let n = assembly.declare_unknowns().len();
                        assembly.apply_trial(&trial[offset..offset + n])?;
                        offset += n;
                        let result = assembly.evaluate(&cond)?;
                        residuals.extend(assembly.residuals()?.into_iter().map(|r| r.value));
                        if member.role == Role::Canonical {
                            cache.publish(
                                key,
                                CacheEntry {
                                    canonical: assembly.tag().to_string(),
                                    freestream: point.freestream,
                                    core: result.core.clone(),
                                },
                            )?;
                        }
                        result
                    }
                };
                reports.push(AssemblyReport {
                    distributor,
                    tag: assembly.tag().to_string(),
                    role: member.role,
                    result,
                });
            }
        }

        let cache_hits = reports
            .iter()
            .filter(|r| matches!(r.role, Role::Peer { .. }))
            .count();
        debug!(
            network = %self.name,
            control_point = point.index,
            assemblies = reports.len(),
            cache_hits,
            "network evaluated"
        );
        Ok(NetworkEvaluation {
            control_point: point.index,
            residuals,
            reports,
            cache_hits,
        })
    }

    /// Store the last evaluated results of coupled assemblies as final.
    ///
    /// Call after an evaluation at the converged trial vector.
    pub fn finish_point(&mut self) -> NetworkResult<()> {
        for (dist, members) in self.distributors.iter_mut().zip(&self.layout) {
            for (assembly, member) in dist.propulsors_mut().iter_mut().zip(members) {
                if member.role.evaluates() && assembly.is_coupled() {
                    assembly.finish_point()?;
                }
            }
        }
        Ok(())
    }

    /// Tally and commit energy use on every distributor for `point`.
    pub fn commit_point(&mut self, point: &ControlPoint) -> NetworkResult<Vec<CommitReport>> {
        let tallies = self
            .distributors
            .iter()
            .map(|d| d.tally(point.index))
            .collect::<NetworkResult<Vec<_>>>()?;
        self.distributors
            .iter_mut()
            .zip(&tallies)
            .map(|(d, t)| d.commit(t, point.dt_s))
            .collect()
    }
}
