use crate::errors::EvaluatorError;
use crate::layout::{AlignedVec, BodySet, ForceSet, BUFFER_ALIGNMENT};

#[test]
fn test_aligned_vec_alignment_and_contents() {
    for len in [0usize, 1, 15, 16, 17, 1024] {
        let buf = AlignedVec::zeroed(len);
        assert_eq!(buf.len(), len);
        assert_eq!(buf.as_slice().as_ptr() as usize % BUFFER_ALIGNMENT, 0);
        assert!(buf.iter().all(|&v| v == 0.0));
    }

    let values: Vec<f32> = (0..37).map(|i| i as f32).collect();
    let buf = AlignedVec::from_slice(&values);
    assert_eq!(buf.as_slice(), values.as_slice());
}

#[test]
fn test_aligned_vec_mutation_through_deref() {
    let mut buf = AlignedVec::zeroed(8);
    buf[3] = 2.5;
    buf.as_mut_slice()[7] = -1.0;
    assert_eq!(buf[3], 2.5);
    assert_eq!(buf[7], -1.0);
}

#[test]
fn test_body_set_layouts_agree() {
    let bodies = [
        [1.0, 2.0, 3.0, 4.0],
        [-1.0, 0.5, 0.0, 2.0],
        [7.0, -3.0, 1.5, 0.0],
    ];
    let set = BodySet::from_bodies(&bodies);
    assert_eq!(set.len(), 3);

    let interleaved = set.interleaved();
    let (x, y, z, mass) = set.planar();
    for i in 0..set.len() {
        assert_eq!(interleaved[4 * i], x[i]);
        assert_eq!(interleaved[4 * i + 1], y[i]);
        assert_eq!(interleaved[4 * i + 2], z[i]);
        assert_eq!(interleaved[4 * i + 3], mass[i]);
        assert_eq!(x[i], bodies[i][0]);
        assert_eq!(mass[i], bodies[i][3]);
    }

    // Planar buffers must satisfy the lane evaluators' alignment rule.
    assert_eq!(x.as_ptr() as usize % BUFFER_ALIGNMENT, 0);
    assert_eq!(mass.as_ptr() as usize % BUFFER_ALIGNMENT, 0);
}

#[test]
fn test_body_set_from_interleaved_round_trip() {
    let flat = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    let set = BodySet::from_interleaved(&flat).expect("layout construction failed");
    assert_eq!(set.len(), 2);
    assert_eq!(set.interleaved(), &flat);
}

#[test]
fn test_body_set_rejects_ragged_interleaved_buffer() {
    // 10 slots is two whole bodies plus half an entry; the trailing slots
    // must not be silently dropped.
    let err = BodySet::from_interleaved(&[0.0f32; 10]).unwrap_err();
    assert_eq!(err, EvaluatorError::BufferSizeMismatch { expected: 8, actual: 10 });
}

#[test]
fn test_force_set_from_interleaved() {
    let flat = [1.0f32, 2.0, 3.0, -4.0, -5.0, -6.0];
    let forces = ForceSet::from_interleaved(&flat);
    assert_eq!(forces.len(), 2);
    assert_eq!(forces.get(0), [1.0, 2.0, 3.0]);
    assert_eq!(forces.get(1), [-4.0, -5.0, -6.0]);
}
