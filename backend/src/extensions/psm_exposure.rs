//! PSM exposure drag
//!
//! USDS parked in the PSM earns `sofr + spread` instead of the gross
//! revenue rate. The difference is booked as negative gross revenue.
//!
//! Exposure is a share of total USDS supply when a positive `psm_pct` is
//! set (input overrides settings), otherwise an absolute `psm_amount`.

use super::{
    DeclaredInput, ExtensionAdjustment, ExtensionContext, ExtensionPhase, ExtensionState, InputFallback,
    MonthlyExtension,
};
use crate::models::revenue::monthly;
use crate::scenario::inputs::keys;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const NAME: &str = "psm_exposure";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsmExposure {
    /// PSM yield relative to SOFR
    pub spread: Decimal,

    /// Share of total USDS supply held in the PSM
    pub pct: Decimal,

    /// Absolute PSM holdings, used when `pct` is not positive
    pub amount: Decimal,
}

impl Default for PsmExposure {
    fn default() -> Self {
        Self {
            spread: dec!(-0.0030),
            pct: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }
}

impl PsmExposure {
    fn exposure(&self, ctx: &ExtensionContext<'_>) -> (Decimal, Decimal) {
        let pct = ctx.inputs.get_or(keys::PSM_PCT, self.pct);
        if pct > Decimal::ZERO {
            let total_usds = ctx
                .total_usds
                .unwrap_or_else(|| ctx.inputs.get(keys::BASE_USDS));
            (total_usds * pct, pct)
        } else {
            (ctx.inputs.get_or(keys::PSM_AMOUNT, self.amount), Decimal::ZERO)
        }
    }
}

impl MonthlyExtension for PsmExposure {
    fn name(&self) -> &'static str {
        NAME
    }

    fn phase(&self) -> ExtensionPhase {
        ExtensionPhase::SupplyDependent
    }

    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        vec![
            DeclaredInput {
                extension: NAME,
                key: keys::PSM_PCT,
                fallback: InputFallback::Configured(self.pct),
            },
            DeclaredInput {
                extension: NAME,
                key: keys::PSM_AMOUNT,
                fallback: InputFallback::Configured(self.amount),
            },
        ]
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
        let (amount, pct) = self.exposure(ctx);
        if amount <= Decimal::ZERO {
            return ExtensionAdjustment::zero();
        }

        let psm_rate = ctx.rates.sofr + self.spread;
        let drag = monthly(amount * (ctx.rates.gross_revenue_rate - psm_rate));

        let mut adjustment = ExtensionAdjustment {
            gross_revenue_adjustment: -drag,
            ..Default::default()
        };
        adjustment.breakdown.insert("psm_amount".into(), amount);
        adjustment.breakdown.insert("psm_pct".into(), pct);
        adjustment.breakdown.insert("psm_rate".into(), psm_rate);
        adjustment.breakdown.insert("psm_drag".into(), drag);
        adjustment
    }
}
