//! Swap Estimation
//!
//! `SwapRequest -> SwapEstimate` behind a trait so real routing can replace
//! the fixed-rate strategy without touching the builder.

use async_trait::async_trait;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::constants::estimator::FIXED_PRICE_IMPACT;
use crate::state::{apply_slippage, StonfiError, SwapEstimate, SwapRequest};

/// Estimation strategy
#[async_trait]
pub trait SwapEstimator: Send + Sync {
    /// Estimate the output of a swap. Failures surface as
    /// [`StonfiError::EstimationFailed`].
    async fn estimate(&self, request: &SwapRequest) -> Result<SwapEstimate, StonfiError>;
}

/// Deterministic `num/den` exchange rate with constant price impact
#[derive(Debug, Clone)]
pub struct FixedRateEstimator {
    rate_num: BigUint,
    rate_den: BigUint,
    price_impact: f64,
}

impl FixedRateEstimator {
    pub fn new(rate_num: u64, rate_den: u64) -> Self {
        Self {
            rate_num: BigUint::from(rate_num),
            rate_den: BigUint::from(rate_den),
            price_impact: FIXED_PRICE_IMPACT,
        }
    }

    pub fn exchange_rate(&self) -> f64 {
        match (self.rate_num.to_f64(), self.rate_den.to_f64()) {
            (Some(num), Some(den)) if den > 0.0 => num / den,
            _ => 0.0,
        }
    }

    fn quote(&self, request: &SwapRequest) -> Result<SwapEstimate, StonfiError> {
        if self.rate_den.is_zero() {
            return Err(StonfiError::InvalidAmount("zero rate denominator".to_string()));
        }
        let expected_output = &request.amount * &self.rate_num / &self.rate_den;
        let min_output = apply_slippage(&expected_output, request.slippage)?;

        Ok(SwapEstimate {
            expected_output,
            price_impact: self.price_impact,
            exchange_rate: self.exchange_rate(),
            min_output,
        })
    }
}

impl Default for FixedRateEstimator {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[async_trait]
impl SwapEstimator for FixedRateEstimator {
    async fn estimate(&self, request: &SwapRequest) -> Result<SwapEstimate, StonfiError> {
        self.quote(request).map_err(|e| {
            tracing::warn!(
                from = %request.from_token,
                to = %request.to_token,
                error = %e,
                "Swap estimation failed"
            );
            if matches!(e, StonfiError::EstimationFailed(_)) {
                e
            } else {
                StonfiError::EstimationFailed(e.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: u64, slippage: f64) -> SwapRequest {
        SwapRequest {
            from_token: "EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c".to_string(),
            to_token: "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs".to_string(),
            amount: BigUint::from(amount),
            slippage,
            user_address: "EQA2kCVNwVsil2EM2mB0SkXytxCqQjS4mttjDpnXmwG9T6bO".to_string(),
        }
    }

    #[tokio::test]
    async fn test_one_to_one_with_five_percent() {
        let estimate = FixedRateEstimator::default()
            .estimate(&request(100, 5.0))
            .await
            .unwrap();
        assert_eq!(estimate.expected_output, BigUint::from(100u32));
        assert_eq!(estimate.min_output, BigUint::from(95u32));
        assert_eq!(estimate.price_impact, 0.1);
        assert_eq!(estimate.exchange_rate, 1.0);
    }

    #[tokio::test]
    async fn test_min_never_exceeds_expected() {
        let estimator = FixedRateEstimator::new(3, 2);
        for slippage in [0.0, 0.5, 1.0, 50.0, 100.0] {
            let estimate = estimator.estimate(&request(1_000_001, slippage)).await.unwrap();
            assert_eq!(estimate.expected_output, BigUint::from(1_500_001u32));
            assert!(estimate.min_output <= estimate.expected_output);
            if slippage == 0.0 {
                assert_eq!(estimate.min_output, estimate.expected_output);
            }
        }
    }

    #[tokio::test]
    async fn test_invalid_slippage_is_estimation_failure() {
        let err = FixedRateEstimator::default()
            .estimate(&request(100, 150.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StonfiError::EstimationFailed(_)));
    }

    #[tokio::test]
    async fn test_zero_denominator_fails() {
        let err = FixedRateEstimator::new(1, 0)
            .estimate(&request(100, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StonfiError::EstimationFailed(_)));
    }
}
