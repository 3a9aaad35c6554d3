use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RefundTier {
    pub min_hours_before_departure: i64,
    pub refund_percent: u32,
}

/// The cancellation policy published to passengers and applied on cancel
#[derive(Debug, Clone, Serialize)]
pub struct CancellationPolicy {
    pub title: &'static str,
    pub summary: &'static str,
    /// Ordered from the earliest cancellation window to the latest
    pub tiers: &'static [RefundTier],
    pub terms: &'static [&'static str],
}

pub const CANCELLATION_POLICY: CancellationPolicy = CancellationPolicy {
    title: "Shipra Fly cancellation policy",
    summary: "Refunds depend on how long before the scheduled departure a booking is cancelled.",
    tiers: &[
        RefundTier {
            min_hours_before_departure: 24,
            refund_percent: 100,
        },
        RefundTier {
            min_hours_before_departure: 2,
            refund_percent: 50,
        },
        RefundTier {
            min_hours_before_departure: 0,
            refund_percent: 0,
        },
    ],
    terms: &[
        "Bookings cannot be cancelled after the scheduled departure time.",
        "Refunds are issued to the original payment method within 7 working days.",
        "If a flight is cancelled for weather or operational reasons the full fare is refunded.",
    ],
};

impl CancellationPolicy {
    /// Refund in whole rupees for cancelling `hours_before` departure.
    ///
    /// Callers reject cancellations after departure before getting here.
    pub fn refund_for(&self, fare: u32, hours_before: i64) -> u32 {
        let percent = self
            .tiers
            .iter()
            .find(|tier| hours_before >= tier.min_hours_before_departure)
            .map_or(0, |tier| tier.refund_percent);

        fare * percent / 100
    }
}
