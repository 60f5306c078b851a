//! Property-based tests for the register, gate engine, and measurement.
//!
//! Total probability stays at 1 through any sequence of gates and
//! measurements, and the self-inverse gates H and CX undo themselves.

use num_complex::Complex64;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qsv_ir::{ClbitId, Gate, InitialState, QubitId, StandardGate};
use qsv_sim::{ClassicalRegister, NORM_TOLERANCE, Statevector, measure};

const NUM_QUBITS: usize = 3;

fn arb_state() -> impl Strategy<Value = Statevector> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1 << NUM_QUBITS)
        .prop_filter("non-zero norm", |v| {
            v.iter().map(|(re, im)| re * re + im * im).sum::<f64>() > 1e-3
        })
        .prop_map(|v| {
            let amps = v.into_iter().map(|(re, im)| Complex64::new(re, im)).collect();
            Statevector::from_amplitudes(amps).unwrap()
        })
}

fn arb_gate() -> impl Strategy<Value = (StandardGate, Vec<QubitId>)> {
    let q = 0u32..NUM_QUBITS as u32;
    let pair = (0u32..NUM_QUBITS as u32, 0u32..NUM_QUBITS as u32)
        .prop_filter("distinct operands", |(a, b)| a != b);
    let angle = -std::f64::consts::PI..std::f64::consts::PI;
    prop_oneof![
        q.clone().prop_map(|q| (StandardGate::H, vec![QubitId(q)])),
        q.clone().prop_map(|q| (StandardGate::X, vec![QubitId(q)])),
        q.clone().prop_map(|q| (StandardGate::Y, vec![QubitId(q)])),
        q.clone().prop_map(|q| (StandardGate::S, vec![QubitId(q)])),
        (angle.clone(), q.clone()).prop_map(|(t, q)| (StandardGate::Rx(t), vec![QubitId(q)])),
        (angle.clone(), q).prop_map(|(t, q)| (StandardGate::Ry(t), vec![QubitId(q)])),
        pair.clone().prop_map(|(a, b)| (StandardGate::CX, vec![QubitId(a), QubitId(b)])),
        pair.clone().prop_map(|(a, b)| (StandardGate::CZ, vec![QubitId(a), QubitId(b)])),
        pair.clone().prop_map(|(a, b)| (StandardGate::Swap, vec![QubitId(a), QubitId(b)])),
        (angle, pair).prop_map(|(t, (a, b))| (StandardGate::CP(t), vec![QubitId(a), QubitId(b)])),
    ]
}

fn assert_close(a: &Statevector, b: &Statevector) -> Result<(), TestCaseError> {
    for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
        prop_assert!((x - y).norm() < 1e-9, "{} != {}", x, y);
    }
    Ok(())
}

proptest! {
    #[test]
    fn gates_preserve_norm(
        mut sv in arb_state(),
        gates in prop::collection::vec(arb_gate(), 0..30),
    ) {
        for (gate, qubits) in gates {
            sv.apply_gate(&Gate::standard(gate), &qubits).unwrap();
            prop_assert!((sv.norm_sqr() - 1.0).abs() < NORM_TOLERANCE);
        }
    }

    #[test]
    fn measurement_preserves_norm(
        mut sv in arb_state(),
        qubits in prop::collection::vec(0u32..NUM_QUBITS as u32, 1..6),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut creg = ClassicalRegister::new(1);
        for q in qubits {
            let outcome = measure(&mut sv, QubitId(q), &mut creg, ClbitId(0), &mut rng).unwrap();
            prop_assert!((sv.norm_sqr() - 1.0).abs() < NORM_TOLERANCE);
            // The measured qubit is now definite.
            let p0 = sv.probability_zero(QubitId(q)).unwrap();
            let expected_p0 = if outcome { 0.0 } else { 1.0 };
            prop_assert!((p0 - expected_p0).abs() < 1e-9);
        }
    }

    #[test]
    fn hadamard_twice_is_identity(sv in arb_state(), q in 0u32..NUM_QUBITS as u32) {
        let mut after = sv.clone();
        let h = Gate::standard(StandardGate::H);
        after.apply_gate(&h, &[QubitId(q)]).unwrap();
        after.apply_gate(&h, &[QubitId(q)]).unwrap();
        assert_close(&after, &sv)?;
    }

    #[test]
    fn cx_twice_is_identity(
        sv in arb_state(),
        (c, t) in (0u32..NUM_QUBITS as u32, 0u32..NUM_QUBITS as u32).prop_filter("distinct", |(c, t)| c != t),
    ) {
        let mut after = sv.clone();
        let cx = Gate::standard(StandardGate::CX);
        after.apply_gate(&cx, &[QubitId(c), QubitId(t)]).unwrap();
        after.apply_gate(&cx, &[QubitId(c), QubitId(t)]).unwrap();
        assert_close(&after, &sv)?;
    }

    #[test]
    fn initialize_yields_normalized_register(
        amps in prop::collection::vec(-1.0f64..1.0, 4),
        (a, b) in (0u32..NUM_QUBITS as u32, 0u32..NUM_QUBITS as u32).prop_filter("distinct", |(a, b)| a != b),
    ) {
        prop_assume!(amps.iter().map(|x| x * x).sum::<f64>() > 1e-6);
        let state = InitialState::from_real(amps, [QubitId(a), QubitId(b)]).unwrap();
        let mut sv = Statevector::new(NUM_QUBITS);
        sv.initialize(&state).unwrap();
        prop_assert!((sv.norm_sqr() - 1.0).abs() < NORM_TOLERANCE);
    }
}
