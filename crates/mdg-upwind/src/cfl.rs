//! Time step restriction for explicit upwind transport across an interface.

use mdg_grid::Grid;
use mdg_params::Parameters;

use crate::error::UpwindResult;
use crate::interface::{InterfaceData, resolve};

/// Largest stable explicit time step for the interface coupling.
///
/// Every matched pair with non-zero flux gives
/// `|0.5 * a_l / a_h| / |beta / (area * a_h)| * phi_l`, with `a` the
/// apertures of the two cells, `area` the area of the higher face and `phi_l`
/// the storage coefficient of the lower cell; the bound is the minimum.
/// Without any flowing pair there is no restriction and the result is
/// infinite. For grids of equal dimension the lower cell is the cell of the
/// matched lower face.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(dim_h = g_h.dim(), dim_l = g_l.dim(), pairs = interface.face_cells.nnz())
)]
pub fn cfl_bound(
    g_h: &Grid,
    g_l: &Grid,
    params_h: &Parameters,
    params_l: &Parameters,
    interface: &InterfaceData,
) -> UpwindResult<f64> {
    let (_, beta, matched) = resolve(g_h, g_l, interface)?;
    let aperture_h = params_h.aperture(g_h)?;
    let aperture_l = params_l.aperture(g_l)?;
    let phi_l = params_l.phi(g_l)?;
    let areas = g_h.face_areas();

    let dt = matched
        .iter()
        .filter(|m| beta[m.face_h] != 0.0)
        .map(|m| {
            let a_h = aperture_h[m.cell_h];
            let dist = 0.5 * aperture_l[m.cell_l] / a_h;
            let speed = beta[m.face_h] / (areas[m.face_h] * a_h);
            (dist / speed).abs() * phi_l[m.cell_l]
        })
        .fold(f64::INFINITY, f64::min);

    tracing::debug!(dt, "interface CFL bound");
    Ok(dt)
}
