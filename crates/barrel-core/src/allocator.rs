//! Proportional allocation of a terminal volume across partners.
//!
//! Each partner is carried through the run as one [`PartnerShare`] that the
//! steps below update in place:
//!
//! 1. raw percentage of total net volume
//! 2. cap at the percentage ceiling
//! 3. normalize to 100% and cap again
//! 4. volume from percentage
//! 5. cap at `gross × gross_cap_ratio`
//! 6. round to cents and measure the residual against the terminal volume
//! 7. positive residual: spread over partners with room, proportional to room
//! 8. negative residual: take it back from the largest allocations
//! 9. final percentages from the allocated volumes, largest-remainder rounded
//!
//! Terminal volume that no partner can absorb is reported as
//! `unallocated_volume`, never forced onto a partner.

use barrel_calculator::{floor_to_cents, round_to_cents};
use barrel_types::{AllocationOutput, CorrectedEntry, PartnerAllocation};
use tracing::{debug, warn};

use crate::config::AllocationConfig;
use crate::error::{BarrelError, BarrelResult};

#[derive(Debug, Clone)]
struct PartnerShare {
    partner: String,
    input_volume: f64,
    net_volume: f64,
    cap: f64,
    percentage: f64,
    allocated: f64,
}

impl PartnerShare {
    fn new(entry: &CorrectedEntry, gross_cap_ratio: f64) -> Self {
        Self {
            partner: entry.input.partner.clone(),
            input_volume: entry.input.gross_volume_bbl,
            net_volume: entry.net_volume,
            cap: entry.input.gross_volume_bbl * gross_cap_ratio,
            percentage: 0.0,
            allocated: 0.0,
        }
    }

    /// Volume that can still be added without rounding past the cap.
    fn room(&self) -> f64 {
        round_to_cents(floor_to_cents(self.cap) - self.allocated).max(0.0)
    }

    fn into_allocation(self, percentage: f64) -> PartnerAllocation {
        PartnerAllocation {
            partner: self.partner,
            input_volume: round_to_cents(self.input_volume),
            net_volume: round_to_cents(self.net_volume),
            allocated_volume: self.allocated,
            percentage,
            volume_loss: round_to_cents(self.input_volume - self.allocated),
        }
    }
}

/// Step 9: final percentages from the allocated volumes, rounded to cents by
/// largest remainder so they sum to exactly 100.00 whenever anything was
/// allocated. No partner goes past `ceiling`; ties go to the partner that
/// comes first.
fn final_percentages(shares: &[PartnerShare], ceiling: f64) -> Vec<f64> {
    let total_allocated: f64 = shares.iter().map(|s| s.allocated).sum();
    if total_allocated <= 0.0 {
        return vec![0.0; shares.len()];
    }

    let max_cents = (ceiling * 100.0).floor() as i64;
    let exact: Vec<f64> = shares
        .iter()
        .map(|s| (s.allocated / total_allocated * 100.0).min(ceiling) * 100.0)
        .collect();
    let mut cents: Vec<i64> = exact.iter().map(|c| (c.floor() as i64).min(max_cents)).collect();

    let mut missing = 10_000 - cents.iter().sum::<i64>();
    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - cents[a] as f64;
        let rb = exact[b] - cents[b] as f64;
        rb.total_cmp(&ra)
    });
    for idx in order {
        if missing <= 0 {
            break;
        }
        if cents[idx] < max_cents {
            cents[idx] += 1;
            missing -= 1;
        }
    }

    cents.into_iter().map(|c| c as f64 / 100.0).collect()
}

fn residual(shares: &[PartnerShare], terminal_volume: f64) -> f64 {
    let allocated: f64 = shares.iter().map(|s| s.allocated).sum();
    round_to_cents(terminal_volume - allocated)
}

#[derive(Debug, Clone, Copy)]
pub struct ProportionalAllocator {
    percentage_ceiling: f64,
    gross_cap_ratio: f64,
    sort_partners_by_name: bool,
}

impl Default for ProportionalAllocator {
    fn default() -> Self {
        Self::new(&AllocationConfig::default())
    }
}

impl ProportionalAllocator {
    pub fn new(config: &AllocationConfig) -> Self {
        Self {
            percentage_ceiling: config.percentage_ceiling,
            gross_cap_ratio: config.gross_cap_ratio,
            sort_partners_by_name: config.sort_partners_by_name,
        }
    }

    /// Distributes `terminal_volume` across the corrected entries.
    ///
    /// Fails only when `entries` is empty; every other degenerate case yields an
    /// output with explanatory `warnings`.
    pub fn allocate(
        &self,
        entries: &[CorrectedEntry],
        terminal_volume: f64,
    ) -> BarrelResult<AllocationOutput> {
        if entries.is_empty() {
            return Err(BarrelError::EmptyInput);
        }

        let mut warnings = Vec::new();
        let total_net: f64 = entries.iter().map(|e| e.net_volume).sum();
        let total_input: f64 = entries.iter().map(|e| e.input.gross_volume_bbl).sum();

        let mut shares: Vec<PartnerShare> =
            entries.iter().map(|e| PartnerShare::new(e, self.gross_cap_ratio)).collect();
        if self.sort_partners_by_name {
            shares.sort_by(|a, b| a.partner.cmp(&b.partner));
        }

        if total_net <= 0.0 {
            let message =
                "Total net volume is zero; terminal volume is spread by available capacity"
                    .to_string();
            warn!("{}", message);
            warnings.push(message);
        }

        self.assign_percentages(&mut shares, total_net);
        self.assign_volumes(&mut shares, terminal_volume, &mut warnings);

        let mut remaining = residual(&shares, terminal_volume);
        debug!(residual = remaining, "residual after rounding");

        if remaining > 0.0 {
            Self::redistribute_excess(&mut shares, remaining);
            remaining = residual(&shares, terminal_volume);
            if remaining > 0.0 {
                Self::settle_cents(&mut shares, remaining);
                remaining = residual(&shares, terminal_volume);
            }
        }
        if remaining < 0.0 {
            Self::correct_overshoot(&mut shares, -remaining, &mut warnings);
            remaining = residual(&shares, terminal_volume);
        }

        let unallocated_volume = remaining.max(0.0);
        if unallocated_volume > 0.0 {
            let message = format!(
                "{unallocated_volume:.2} bbl of terminal volume could not be allocated: every partner is at its gross input cap"
            );
            warn!("{}", message);
            warnings.push(message);
        }

        let percentages = final_percentages(&shares, self.percentage_ceiling);
        let allocation_results: Vec<PartnerAllocation> = shares
            .into_iter()
            .zip(percentages)
            .map(|(s, percentage)| s.into_allocation(percentage))
            .collect();

        let shrinkage_factor = if total_net > 0.0 {
            round_to_cents((total_net - terminal_volume) / total_net * 100.0)
        } else {
            0.0
        };

        Ok(AllocationOutput {
            total_terminal_volume: round_to_cents(terminal_volume),
            total_input_volume: round_to_cents(total_input),
            total_net_volume: round_to_cents(total_net),
            shrinkage_factor,
            unallocated_volume,
            allocation_results,
            warnings,
        })
    }

    /// Steps 1-3: raw share of net volume, ceiling, normalization, ceiling again.
    fn assign_percentages(&self, shares: &mut [PartnerShare], total_net: f64) {
        for share in shares.iter_mut() {
            let raw = if total_net > 0.0 { share.net_volume / total_net * 100.0 } else { 0.0 };
            share.percentage = raw.max(0.0).min(self.percentage_ceiling);
        }

        let total_capped: f64 = shares.iter().map(|s| s.percentage).sum();
        if total_capped > 0.0 {
            for share in shares.iter_mut() {
                share.percentage =
                    (share.percentage / total_capped * 100.0).min(self.percentage_ceiling);
            }
        }
    }

    /// Steps 4-6: volume from percentage, gross-input cap, rounding.
    fn assign_volumes(
        &self,
        shares: &mut [PartnerShare],
        terminal_volume: f64,
        warnings: &mut Vec<String>,
    ) {
        for share in shares.iter_mut() {
            let allocated = terminal_volume * share.percentage / 100.0;
            if allocated > share.cap {
                let message = format!(
                    "Partner '{}' capped at {:.1}% of gross input ({:.2} bbl)",
                    share.partner,
                    self.gross_cap_ratio * 100.0,
                    share.cap
                );
                debug!("{}", message);
                warnings.push(message);
                share.allocated = floor_to_cents(share.cap);
            } else {
                share.allocated = round_to_cents(allocated);
            }
        }
    }

    /// Step 7: spread a positive residual over partners with room, proportional
    /// to their room and never past their cap.
    fn redistribute_excess(shares: &mut [PartnerShare], excess: f64) {
        let total_room: f64 = shares.iter().map(PartnerShare::room).sum();
        if total_room <= 0.0 {
            return;
        }
        let distributable = excess.min(total_room);

        for share in shares.iter_mut() {
            let room = share.room();
            if room <= 0.0 {
                continue;
            }
            let portion = round_to_cents(distributable * room / total_room).min(room);
            share.allocated = round_to_cents(share.allocated + portion);
        }
        debug!(excess, total_room, "redistributed excess");
    }

    /// Places cents left over by proportional rounding on the partners with the
    /// most room.
    fn settle_cents(shares: &mut [PartnerShare], leftover: f64) {
        let mut remaining = leftover;
        for _ in 0..shares.len() {
            if remaining <= 0.0 {
                break;
            }
            let Some(idx) = (0..shares.len())
                .filter(|&i| shares[i].room() > 0.0)
                .reduce(|best, i| if shares[i].room() > shares[best].room() { i } else { best })
            else {
                break;
            };
            let portion = remaining.min(shares[idx].room());
            shares[idx].allocated = round_to_cents(shares[idx].allocated + portion);
            remaining = round_to_cents(remaining - portion);
        }
    }

    /// Step 8: remove an over-allocation starting with the largest allocation.
    ///
    /// Each partner is floored at zero; whatever one partner cannot absorb moves
    /// on to the next largest. Ties go to the partner that comes first.
    fn correct_overshoot(shares: &mut [PartnerShare], overshoot: f64, warnings: &mut Vec<String>) {
        let mut order: Vec<usize> = (0..shares.len()).collect();
        order.sort_by(|&a, &b| shares[b].allocated.total_cmp(&shares[a].allocated));

        let mut remaining = overshoot;
        let mut absorbed_by = 0usize;
        for idx in order {
            if remaining <= 0.0 {
                break;
            }
            let take = remaining.min(shares[idx].allocated);
            if take <= 0.0 {
                continue;
            }
            shares[idx].allocated = round_to_cents(shares[idx].allocated - take);
            remaining = round_to_cents(remaining - take);
            absorbed_by += 1;
        }

        debug!(overshoot, absorbed_by, "corrected over-allocation");
        if absorbed_by > 1 {
            let message = format!(
                "Over-allocation of {overshoot:.2} bbl exceeded the largest allocation and was spread across {absorbed_by} partners"
            );
            warn!("{}", message);
            warnings.push(message);
        }
    }
}
