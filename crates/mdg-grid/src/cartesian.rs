//! Cartesian grid constructors.
//!
//! Numbering follows one convention in every dimension: nodes run fastest in
//! x, then y, then z; faces are numbered x-faces first, then y-faces, then
//! z-faces; cells run fastest in x. All face normals point in the positive
//! axis direction, so a cell sees its lower faces with sign -1 and its upper
//! faces with sign +1.

use nalgebra::Vector3;

use crate::builder::GridBuilder;
use crate::error::{GridError, GridResult};
use crate::grid::Grid;

/// A 0-d grid: one cell on one node.
pub fn point_grid(point: Vector3<f64>) -> GridResult<Grid> {
    let mut b = GridBuilder::new(0);
    b.add_node(point);
    b.add_cell(&[]);
    b.build()
}

/// `n` equal cells on `[0, length]` along the x-axis.
pub fn cart_grid_1d(n: usize, length: f64) -> GridResult<Grid> {
    check_sizes(&[n], &[length])?;
    let h = length / n as f64;

    let mut b = GridBuilder::new(1);
    for i in 0..=n {
        let node = b.add_node(Vector3::new(i as f64 * h, 0.0, 0.0));
        b.add_face(&[node]);
    }
    for i in 0..n {
        b.add_cell(&[(i, -1), (i + 1, 1)]);
    }
    b.build()
}

/// `nx * ny` equal cells on `[0, lx] x [0, ly]` in the xy-plane.
pub fn cart_grid_2d(cells: [usize; 2], size: [f64; 2]) -> GridResult<Grid> {
    check_sizes(&cells, &size)?;
    let [nx, ny] = cells;
    let (hx, hy) = (size[0] / nx as f64, size[1] / ny as f64);

    let node = |i: usize, j: usize| i + j * (nx + 1);

    let mut b = GridBuilder::new(2);
    for j in 0..=ny {
        for i in 0..=nx {
            b.add_node(Vector3::new(i as f64 * hx, j as f64 * hy, 0.0));
        }
    }

    // x-faces: segment from (i, j) up to (i, j + 1)
    for j in 0..ny {
        for i in 0..=nx {
            b.add_face(&[node(i, j), node(i, j + 1)]);
        }
    }
    let num_x_faces = (nx + 1) * ny;
    // y-faces: segment from (i, j) to (i + 1, j)
    for j in 0..=ny {
        for i in 0..nx {
            b.add_face(&[node(i, j), node(i + 1, j)]);
        }
    }

    let x_face = |i: usize, j: usize| i + j * (nx + 1);
    let y_face = |i: usize, j: usize| num_x_faces + i + j * nx;
    for j in 0..ny {
        for i in 0..nx {
            b.add_cell(&[
                (x_face(i, j), -1),
                (x_face(i + 1, j), 1),
                (y_face(i, j), -1),
                (y_face(i, j + 1), 1),
            ]);
        }
    }
    b.build()
}

/// `nx * ny * nz` equal hexahedra on `[0, lx] x [0, ly] x [0, lz]`.
pub fn cart_grid_3d(cells: [usize; 3], size: [f64; 3]) -> GridResult<Grid> {
    check_sizes(&cells, &size)?;
    let [nx, ny, nz] = cells;
    let h = [
        size[0] / nx as f64,
        size[1] / ny as f64,
        size[2] / nz as f64,
    ];

    let node = |i: usize, j: usize, k: usize| i + j * (nx + 1) + k * (nx + 1) * (ny + 1);

    let mut b = GridBuilder::new(3);
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                b.add_node(Vector3::new(
                    i as f64 * h[0],
                    j as f64 * h[1],
                    k as f64 * h[2],
                ));
            }
        }
    }

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..=nx {
                b.add_face(&[
                    node(i, j, k),
                    node(i, j + 1, k),
                    node(i, j + 1, k + 1),
                    node(i, j, k + 1),
                ]);
            }
        }
    }
    for k in 0..nz {
        for j in 0..=ny {
            for i in 0..nx {
                b.add_face(&[
                    node(i, j, k),
                    node(i + 1, j, k),
                    node(i + 1, j, k + 1),
                    node(i, j, k + 1),
                ]);
            }
        }
    }
    for k in 0..=nz {
        for j in 0..ny {
            for i in 0..nx {
                b.add_face(&[
                    node(i, j, k),
                    node(i + 1, j, k),
                    node(i + 1, j + 1, k),
                    node(i, j + 1, k),
                ]);
            }
        }
    }

    let num_x_faces = (nx + 1) * ny * nz;
    let num_y_faces = nx * (ny + 1) * nz;
    let x_face = |i: usize, j: usize, k: usize| i + j * (nx + 1) + k * (nx + 1) * ny;
    let y_face = |i: usize, j: usize, k: usize| num_x_faces + i + j * nx + k * nx * (ny + 1);
    let z_face =
        |i: usize, j: usize, k: usize| num_x_faces + num_y_faces + i + j * nx + k * nx * ny;

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                b.add_cell(&[
                    (x_face(i, j, k), -1),
                    (x_face(i + 1, j, k), 1),
                    (y_face(i, j, k), -1),
                    (y_face(i, j + 1, k), 1),
                    (z_face(i, j, k), -1),
                    (z_face(i, j, k + 1), 1),
                ]);
            }
        }
    }
    b.build()
}

fn check_sizes(cells: &[usize], size: &[f64]) -> GridResult<()> {
    if cells.contains(&0) || size.iter().any(|&l| !(l > 0.0 && l.is_finite())) {
        return Err(GridError::DegenerateGeometry {
            what: format!("cartesian grid with cells {cells:?} and size {size:?}"),
        });
    }
    Ok(())
}
