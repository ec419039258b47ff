//! Integration tests for mdg-grid geometry and orientation.

use mdg_grid::cartesian::{cart_grid_1d, cart_grid_2d, cart_grid_3d};
use mdg_grid::{GridBuilder, GridError};
use nalgebra::{Rotation3, Vector3};
use proptest::prelude::*;

#[test]
fn outward_normals_sum_to_zero_per_cell() {
    // Divergence theorem: sum of sign * normal over a closed cell vanishes
    let g = cart_grid_3d([2, 2, 1], [1.0, 2.0, 0.5]).unwrap();
    for c in 0..g.num_cells() {
        let total = g
            .cell_faces()
            .row(c)
            .fold(Vector3::zeros(), |acc, (f, s)| acc + g.face_normal(f) * f64::from(s));
        assert!(total.norm() < 1e-12, "cell {c}: {total}");
    }
}

#[test]
fn face_cell_table_matches_cell_faces() {
    let g = cart_grid_2d([3, 2], [3.0, 2.0]).unwrap();
    for c in 0..g.num_cells() {
        for (f, s) in g.cell_faces().row(c) {
            assert_eq!(g.face_sign(f, c), Some(s));
        }
    }
    // Two boundary x-faces per cell row, plus the bottom and top y-faces
    let boundary = g.boundary_faces();
    assert_eq!(boundary.len(), 2 * 2 + 2 * 3);
}

#[test]
fn triangle_grid_by_hand() {
    // Two triangles sharing the diagonal of the unit square
    let mut b = GridBuilder::new(2);
    let n0 = b.add_node(Vector3::new(0.0, 0.0, 0.0));
    let n1 = b.add_node(Vector3::new(1.0, 0.0, 0.0));
    let n2 = b.add_node(Vector3::new(1.0, 1.0, 0.0));
    let n3 = b.add_node(Vector3::new(0.0, 1.0, 0.0));
    let f0 = b.add_face(&[n0, n1]);
    let f1 = b.add_face(&[n1, n2]);
    let f2 = b.add_face(&[n2, n0]);
    let f3 = b.add_face(&[n2, n3]);
    let f4 = b.add_face(&[n3, n0]);
    b.add_cell(&[(f0, 1), (f1, 1), (f2, 1)]);
    b.add_cell(&[(f2, -1), (f3, 1), (f4, 1)]);
    let g = b.build().unwrap();

    assert!((g.cell_volumes()[0] - 0.5).abs() < 1e-14);
    assert!((g.cell_volumes()[1] - 0.5).abs() < 1e-14);
    assert!((g.cell_center(0) - Vector3::new(2.0 / 3.0, 1.0 / 3.0, 0.0)).norm() < 1e-14);
    assert!((g.face_areas()[f2] - 2.0_f64.sqrt()).abs() < 1e-14);

    // The shared diagonal points out of cell 0, towards cell 1
    let n = g.face_normal(f2);
    assert!((n - Vector3::new(-1.0, 1.0, 0.0)).norm() < 1e-14);
}

/// U-shaped polygon: the 10 x 10 square minus the notch [1, 9] x [1, 10].
/// Several faces list their nodes against the traversal direction.
fn u_shaped_cell() -> GridBuilder {
    let mut b = GridBuilder::new(2);
    let corners = [
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (9.0, 10.0),
        (9.0, 1.0),
        (1.0, 1.0),
        (1.0, 10.0),
        (0.0, 10.0),
    ];
    for (x, y) in corners {
        b.add_node(Vector3::new(x, y, 0.0));
    }
    for pair in [[0, 1], [2, 1], [2, 3], [4, 3], [4, 5], [6, 5], [6, 7], [7, 0]] {
        b.add_face(&pair);
    }
    b.add_cell(&[(0, 1), (1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (6, 1), (7, 1)]);
    b
}

#[test]
fn non_convex_cell_has_exact_area_and_outward_normals() {
    let g = u_shaped_cell().build().unwrap();
    assert!((g.cell_volumes()[0] - 28.0).abs() < 1e-12);
    let expected_center = Vector3::new(5.0, 26.0 / 7.0, 0.0);
    assert!((g.cell_center(0) - expected_center).norm() < 1e-12);

    // Bottom of the notch faces up, its walls face into the notch
    assert!((g.face_normal(4) - Vector3::new(0.0, 8.0, 0.0)).norm() < 1e-12);
    assert!((g.face_normal(3) - Vector3::new(-9.0, 0.0, 0.0)).norm() < 1e-12);
    assert!((g.face_normal(5) - Vector3::new(9.0, 0.0, 0.0)).norm() < 1e-12);
    assert!((g.face_normal(0) - Vector3::new(0.0, -10.0, 0.0)).norm() < 1e-12);
}

#[test]
fn non_convex_prism_has_exact_volume() {
    // L-shaped prism: [0, 2] x [0, 2] minus [1, 2] x [1, 2], extruded to z = 3
    let outline = [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)];
    let m = outline.len();
    let mut b = GridBuilder::new(3);
    for z in [0.0, 3.0] {
        for (x, y) in outline {
            b.add_node(Vector3::new(x, y, z));
        }
    }
    let bottom: Vec<usize> = (0..m).collect();
    let top: Vec<usize> = (m..2 * m).collect();
    let mut faces: Vec<(usize, i8)> = vec![(b.add_face(&bottom), 1), (b.add_face(&top), 1)];
    for i in 0..m {
        let j = (i + 1) % m;
        faces.push((b.add_face(&[i, j, j + m, i + m]), 1));
    }
    b.add_cell(&faces);
    let g = b.build().unwrap();

    assert!((g.cell_volumes()[0] - 9.0).abs() < 1e-12);
    // Area-weighted centroid of the three unit squares, at mid height
    let expected_center = Vector3::new(5.0 / 6.0, 5.0 / 6.0, 1.5);
    assert!((g.cell_center(0) - expected_center).norm() < 1e-12);
    // The re-entrant wall x = 1 faces +x
    assert!((g.face_normal(2 + 3) - Vector3::new(3.0, 0.0, 0.0)).norm() < 1e-12);
}

#[test]
fn open_cell_boundary_is_rejected() {
    let mut b = GridBuilder::new(2);
    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
        b.add_node(Vector3::new(x, y, 0.0));
    }
    for pair in [[0, 1], [1, 2], [2, 3]] {
        b.add_face(&pair);
    }
    b.add_cell(&[(0, 1), (1, 1), (2, 1)]);
    assert_eq!(
        b.build().unwrap_err(),
        GridError::OpenCellBoundary { cell: 0 }
    );
}

#[test]
fn builder_rejects_same_sign_on_shared_face() {
    let mut b = GridBuilder::new(1);
    for i in 0..3 {
        let n = b.add_node(Vector3::new(i as f64, 0.0, 0.0));
        b.add_face(&[n]);
    }
    b.add_cell(&[(0, -1), (1, 1)]);
    b.add_cell(&[(1, 1), (2, 1)]);
    assert_eq!(
        b.build().unwrap_err(),
        GridError::InconsistentOrientation { face: 1 }
    );
}

#[test]
fn transformed_grid_keeps_measures_and_frame() {
    let g = cart_grid_2d([2, 2], [1.0, 1.0]).unwrap();
    let rot = Rotation3::from_euler_angles(0.3, -0.7, 1.1).into_inner();
    let moved = g.transformed(&rot, &Vector3::new(1.0, -2.0, 0.5));

    assert_eq!(moved.cell_volumes(), g.cell_volumes());
    let frame = moved.reference_frame().unwrap();
    assert_eq!(frame.dim(), 2);

    // Distances between projected nodes are preserved
    let flat = frame.project_columns(moved.nodes());
    let d_flat = (flat.column(0) - flat.column(8)).norm();
    let d_orig = (g.node(0) - g.node(8)).norm();
    assert!((d_flat - d_orig).abs() < 1e-12);
}

#[test]
fn line_in_space_frame() {
    let g = cart_grid_1d(4, 2.0).unwrap();
    let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), 0.9).into_inner();
    let moved = g.transformed(&rot, &Vector3::zeros());
    let frame = moved.reference_frame().unwrap();
    assert_eq!(frame.active(), [true, false, false]);
    let n = frame.project_vector(&moved.face_normal(0));
    assert!((n[0].abs() - 1.0).abs() < 1e-12);
}

proptest! {
    #[test]
    fn cartesian_volumes_add_up(
        nx in 1usize..6,
        ny in 1usize..6,
        lx in 0.1f64..10.0,
        ly in 0.1f64..10.0,
    ) {
        let g = cart_grid_2d([nx, ny], [lx, ly]).unwrap();
        let total: f64 = g.cell_volumes().iter().sum();
        prop_assert!((total - lx * ly).abs() < 1e-10 * lx * ly);
        for f in 0..g.num_faces() {
            let cells = g.face_cells().row_indices(f).len();
            prop_assert!(cells == 1 || cells == 2);
        }
    }
}
