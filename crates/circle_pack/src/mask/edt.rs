//! Exact Euclidean distance transform (EDT) over occupancy masks.
//!
//! Felzenszwalb-Huttenlocher: the squared distance is the lower envelope of
//! parabolas rooted at forbidden cells, computed separably with one 1D pass over
//! rows followed by one over columns.

/// Squared distance of every cell to the nearest `true` (forbidden) cell.
///
/// `forbidden` is row-major with size `w * h`. A grid without forbidden cells gets
/// `w² + h²` everywhere, a value larger than any real squared distance inside it.
pub fn squared_distance_to_forbidden(forbidden: &[bool], w: usize, h: usize) -> Vec<f32> {
    debug_assert_eq!(forbidden.len(), w * h, "mask size must match dimensions");

    let unreached = (w * w + h * h) as f32;
    let mut f: Vec<f32> = forbidden
        .iter()
        .map(|&blocked| if blocked { 0.0 } else { unreached })
        .collect();

    let mut envelope = Envelope::with_capacity(w.max(h));

    let mut row_out = vec![0.0; w];
    for row in f.chunks_exact_mut(w) {
        envelope.transform(row, &mut row_out);
        row.copy_from_slice(&row_out);
    }

    let mut col_in = vec![0.0; h];
    let mut col_out = vec![0.0; h];
    for x in 0..w {
        for (y, v) in col_in.iter_mut().enumerate() {
            *v = f[y * w + x];
        }
        envelope.transform(&col_in, &mut col_out);
        for (y, v) in col_out.iter().enumerate() {
            f[y * w + x] = *v;
        }
    }

    f
}

/// Scratch buffers for the 1D lower-envelope pass, reused across rows and columns.
struct Envelope {
    /// Roots of the parabolas currently in the envelope.
    roots: Vec<usize>,
    /// Boundaries between consecutive envelope parabolas.
    bounds: Vec<f32>,
}

impl Envelope {
    fn with_capacity(n: usize) -> Self {
        Self {
            roots: vec![0; n.max(1)],
            bounds: vec![0.0; n.max(1) + 1],
        }
    }

    /// 1D squared distance transform of the sampled function `f` into `out`.
    fn transform(&mut self, f: &[f32], out: &mut [f32]) {
        let n = f.len();
        debug_assert_eq!(n, out.len());
        if n == 0 {
            return;
        }

        let roots = &mut self.roots;
        let bounds = &mut self.bounds;
        let mut k = 0;
        roots[0] = 0;
        bounds[0] = f32::NEG_INFINITY;
        bounds[1] = f32::INFINITY;

        for q in 1..n {
            let mut s = crossing(f, q, roots[k]);
            // bounds[0] is -inf, so k never underflows for finite inputs.
            while k > 0 && s <= bounds[k] {
                k -= 1;
                s = crossing(f, q, roots[k]);
            }
            k += 1;
            roots[k] = q;
            bounds[k] = s;
            bounds[k + 1] = f32::INFINITY;
        }

        k = 0;
        for (q, dq) in out.iter_mut().enumerate() {
            while bounds[k + 1] < q as f32 {
                k += 1;
            }
            let dx = q as f32 - roots[k] as f32;
            *dq = dx * dx + f[roots[k]];
        }
    }
}

/// Abscissa where the parabolas rooted at `q` and `r` (`q > r`) intersect.
#[inline]
fn crossing(f: &[f32], q: usize, r: usize) -> f32 {
    let qf = q as f32;
    let rf = r as f32;
    ((f[q] + qf * qf) - (f[r] + rf * rf)) / (2.0 * (qf - rf))
}
