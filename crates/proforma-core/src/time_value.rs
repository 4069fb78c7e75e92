use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::ProFormaError;
use crate::types::{Money, Rate};
use crate::ProFormaResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;
const MIN_RATE: Decimal = dec!(-0.99);
const MAX_RATE: Decimal = dec!(100);
/// Upper ends tried, in order, when bracketing a root for bisection
const BISECTION_UPPER_BOUNDS: [Decimal; 2] = [dec!(1), dec!(10)];

/// Net Present Value of a series of periodic cash flows (first flow undiscounted).
pub fn npv(rate: Rate, cash_flows: &[Money]) -> ProFormaResult<Money> {
    if rate <= dec!(-1) {
        return Err(ProFormaError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    npv_and_derivative(cash_flows, rate)
        .map(|(value, _)| value)
        .ok_or_else(|| ProFormaError::InvalidInput {
            field: "rate".into(),
            reason: format!("NPV overflows decimal range at rate {rate}"),
        })
}

/// Internal Rate of Return of periodic cash flows.
///
/// Newton-Raphson from `guess`; if that stalls, leaves the search interval or
/// overflows, falls back to bisection over a bracketed sign change.
pub fn irr(cash_flows: &[Money], guess: Rate) -> ProFormaResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(ProFormaError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    if let Some(rate) = newton_raphson(cash_flows, guess) {
        return Ok(rate);
    }

    bisection(cash_flows).ok_or_else(|| ProFormaError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta: npv_and_derivative(cash_flows, guess)
            .map(|(value, _)| value)
            .unwrap_or(Decimal::MAX),
    })
}

/// Compound a monthly rate to an annual one: (1 + r)^12 - 1.
pub fn annualize_monthly(monthly: Rate) -> Option<Rate> {
    let growth = (Decimal::ONE + monthly).checked_powi(12)?;
    Some(growth - Decimal::ONE)
}

fn newton_raphson(cash_flows: &[Money], guess: Rate) -> Option<Rate> {
    let mut rate = guess;

    for _ in 0..MAX_IRR_ITERATIONS {
        let (npv_val, dnpv) = npv_and_derivative(cash_flows, rate)?;

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Some(rate);
        }
        if dnpv.is_zero() {
            return None;
        }

        // Guard against divergence
        let next = (rate - npv_val.checked_div(dnpv)?).clamp(MIN_RATE, MAX_RATE);

        if (next - rate).abs() < CONVERGENCE_THRESHOLD {
            // Pinned against a guard rail is not a root
            if next == MIN_RATE || next == MAX_RATE {
                return None;
            }
            return Some(next);
        }
        rate = next;
    }

    None
}

fn bisection(cash_flows: &[Money]) -> Option<Rate> {
    let mut lo = MIN_RATE;
    let mut f_lo = npv_sign(cash_flows, lo)?;
    if f_lo.is_zero() {
        return Some(lo);
    }

    let mut hi = None;
    for upper in BISECTION_UPPER_BOUNDS {
        let f_upper = npv_sign(cash_flows, upper)?;
        if f_upper.is_zero() {
            return Some(upper);
        }
        if f_upper.is_sign_negative() != f_lo.is_sign_negative() {
            hi = Some(upper);
            break;
        }
    }
    let mut hi = hi?;

    for _ in 0..MAX_IRR_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        let f_mid = npv_sign(cash_flows, mid)?;
        if f_mid.is_zero() || (hi - lo) / dec!(2) < CONVERGENCE_THRESHOLD {
            return Some(mid);
        }
        if f_mid.is_sign_negative() == f_lo.is_sign_negative() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    None
}

/// NPV(r) and dNPV/dr by Horner's rule in v = 1/(1+r).
///
/// NPV = P(v) = sum CF_t v^t, and dNPV/dr = P'(v) * dv/dr = -P'(v) v^2.
/// Returns None when an intermediate leaves the decimal range.
fn npv_and_derivative(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let v = Decimal::ONE.checked_div(Decimal::ONE + rate)?;
    let mut p = Decimal::ZERO;
    let mut dp = Decimal::ZERO;

    for cf in cash_flows.iter().rev() {
        dp = dp.checked_mul(v)?.checked_add(p)?;
        p = p.checked_mul(v)?.checked_add(*cf)?;
    }

    let dnpv = -dp.checked_mul(v)?.checked_mul(v)?;
    Some((p, dnpv))
}

/// A value with the same sign as NPV(r) that stays bounded for every r > -1.
///
/// For r < 0 the discount factor exceeds one, so evaluate
/// NPV(r) * (1+r)^(n-1) = sum CF_t (1+r)^(n-1-t) instead.
fn npv_sign(cash_flows: &[Money], rate: Rate) -> Option<Decimal> {
    if rate >= Decimal::ZERO {
        return npv_and_derivative(cash_flows, rate).map(|(value, _)| value);
    }

    let x = Decimal::ONE + rate;
    let mut acc = Decimal::ZERO;
    for cf in cash_flows {
        acc = acc.checked_mul(x)?.checked_add(*cf)?;
    }
    Some(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_npv_basic() {
        let cfs = vec![dec!(-1000), dec!(300), dec!(400), dec!(500)];
        let result = npv(dec!(0.10), &cfs).unwrap();
        // NPV at 10%: -1000 + 300/1.1 + 400/1.21 + 500/1.331 ≈ -21.04
        assert!((result - dec!(-21.04)).abs() < dec!(1.0));
    }

    #[test]
    fn test_npv_zero_rate() {
        let cfs = vec![dec!(-100), dec!(50), dec!(50), dec!(50)];
        let result = npv(dec!(0.0), &cfs).unwrap();
        assert_eq!(result, dec!(50));
    }

    #[test]
    fn test_npv_rejects_rate_at_minus_one() {
        assert!(npv(dec!(-1), &[dec!(-1), dec!(2)]).is_err());
    }

    #[test]
    fn test_irr_basic() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = irr(&cfs, dec!(0.10)).unwrap();
        // IRR should be ~9.7%
        assert!((result - dec!(0.097)).abs() < dec!(0.01));
    }

    #[test]
    fn test_irr_root_has_zero_npv() {
        let cfs = vec![dec!(-500), dec!(-200), dec!(0), dec!(300), dec!(600)];
        let rate = irr(&cfs, dec!(0.01)).unwrap();
        assert!(npv(rate, &cfs).unwrap().abs() < dec!(0.001));
    }

    #[test]
    fn test_irr_negative_rate() {
        // Get back less than invested: -1000 then 900 a period later => -10%
        let cfs = vec![dec!(-1000), dec!(900)];
        let rate = irr(&cfs, dec!(0.01)).unwrap();
        assert!((rate - dec!(-0.10)).abs() < dec!(0.00001));
    }

    #[test]
    fn test_irr_from_guess_on_lower_rail() {
        // Guess sits on the lower guard rail; the answer is still 9.7%
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = irr(&cfs, MIN_RATE).unwrap();
        assert!((result - dec!(0.097)).abs() < dec!(0.01));
    }

    #[test]
    fn test_irr_no_sign_change_fails() {
        let cfs = vec![dec!(-100), dec!(-100), dec!(-50)];
        assert!(matches!(
            irr(&cfs, dec!(0.01)),
            Err(ProFormaError::ConvergenceFailure { .. })
        ));
    }

    #[test]
    fn test_irr_requires_two_flows() {
        assert!(matches!(
            irr(&[dec!(-100)], dec!(0.1)),
            Err(ProFormaError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_annualize_monthly() {
        let annual = annualize_monthly(dec!(0.01)).unwrap();
        // 1.01^12 - 1 ≈ 12.68%
        assert!((annual - dec!(0.126825)).abs() < dec!(0.000001));
        assert_eq!(annualize_monthly(Decimal::ZERO), Some(Decimal::ZERO));
    }
}
