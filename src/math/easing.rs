//! Scalar easing and shaping helpers shared by the host evaluator and mirrored in WGSL

/// Linear interpolation, `t = 0` gives `a`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Progress raised to a per-category easing weight.
///
/// Low weights arrive early, high weights late; the endpoints are fixed at
/// 0 and 1 for every positive weight.
#[inline]
pub fn eased_progress(progress: f32, weight: f32) -> f32 {
    progress.clamp(0.0, 1.0).powf(weight.max(f32::EPSILON))
}

/// GLSL-style smoothstep; `edge0 > edge1` gives a falling edge
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Sharp sparkle pulse: a raised sine pushed through `sharpness`.
///
/// With sharpness 1 this is a plain oscillation; the 2..10 range used by the
/// scene turns it into brief, infrequent flashes.
#[inline]
pub fn twinkle(time: f32, frequency: f32, phase: f32, sharpness: f32) -> f32 {
    (0.5 + 0.5 * (time * frequency + phase).sin()).powf(sharpness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eased_progress_endpoints() {
        for weight in [0.35, 0.5, 0.6, 1.0, 1.3, 4.0] {
            assert_eq!(eased_progress(0.0, weight), 0.0);
            assert_eq!(eased_progress(1.0, weight), 1.0);
        }
    }

    #[test]
    fn test_eased_progress_in_unit_range() {
        for weight in [0.1, 0.35, 1.0, 1.3, 10.0] {
            for i in 0..=100 {
                let p = i as f32 / 100.0;
                let e = eased_progress(p, weight);
                assert!((0.0..=1.0).contains(&e), "p={p} w={weight} -> {e}");
            }
        }
    }

    #[test]
    fn test_low_weight_arrives_first() {
        for i in 1..100 {
            let p = i as f32 / 100.0;
            assert!(eased_progress(p, 0.35) > eased_progress(p, 1.0));
            assert!(eased_progress(p, 1.0) > eased_progress(p, 1.3));
        }
    }

    #[test]
    fn test_smoothstep_falling_edge() {
        assert_eq!(smoothstep(15.0, 10.0, 16.0), 0.0);
        assert_eq!(smoothstep(15.0, 10.0, 5.0), 1.0);
        assert!((smoothstep(15.0, 10.0, 12.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_twinkle_is_sharper_than_oscillation() {
        // Fraction of a period spent above half brightness
        let bright = |sharpness: f32| {
            (0..1000)
                .filter(|i| twinkle(*i as f32 / 1000.0, std::f32::consts::TAU, 0.0, sharpness) > 0.5)
                .count()
        };
        assert!(bright(1.0) > 450);
        assert!(bright(10.0) < 200);
        for i in 0..100 {
            let v = twinkle(i as f32 * 0.1, 4.0, 0.3, 10.0);
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
