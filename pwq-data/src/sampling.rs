use pwq_core::coordinate::Coordinate;

/// A stretch of a polyline walked from the user's start point.
///
/// The vertices keep the polyline's own order. `reversed` means the start
/// point sits at the last vertex, so positions are counted from that end.
#[derive(Debug, Clone, Copy)]
pub struct Route<'a> {
    vertices: &'a [Coordinate],
    reversed: bool,
}

impl<'a> Route<'a> {
    pub fn new(vertices: &'a [Coordinate], reversed: bool) -> Self {
        Route { vertices, reversed }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Coordinate at fractional vertex position `pos`, counted from the start
    /// end. Whole positions return the vertex itself.
    fn at(&self, pos: f64) -> Coordinate {
        let last = self.vertices.len() - 1;
        let pos = pos.clamp(0.0, last as f64);
        let forward = if self.reversed { last as f64 - pos } else { pos };
        let lo = forward.floor() as usize;
        let frac = forward - lo as f64;
        if frac == 0.0 || lo >= last {
            self.vertices[lo.min(last)]
        } else {
            self.vertices[lo].lerp(&self.vertices[lo + 1], frac)
        }
    }
}

/// One sampled position and its blend fraction (0 at the start, 1 at the end).
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SamplePoint {
    pub coordinate: Coordinate,
    pub t_frac: f64,
}

/// Draw `k` samples index-evenly spaced along `route`, start first.
///
/// A single sample sits at the middle of the route with `t_frac` 0.5, as does
/// the only sample of a one-vertex route whatever `k` is. With
/// `pick_vertices` and `k` no larger than the route, samples snap to the
/// nearest vertex instead of interpolating between neighbours.
pub fn sample_route(route: &Route, k: usize, pick_vertices: bool) -> Vec<SamplePoint> {
    if route.is_empty() || k == 0 {
        return Vec::new();
    }
    let span = (route.len() - 1) as f64;
    if route.len() == 1 || k == 1 {
        let mid = if pick_vertices { (span / 2.0).round_ties_even() } else { span / 2.0 };
        return vec![SamplePoint {
            coordinate: route.at(mid),
            t_frac: 0.5,
        }];
    }
    let snap = pick_vertices && k <= route.len();
    (0..k)
        .map(|i| {
            let t_frac = i as f64 / (k - 1) as f64;
            let pos = i as f64 * span / (k - 1) as f64;
            // halves go to the even vertex
            let pos = if snap { pos.round_ties_even() } else { pos };
            SamplePoint {
                coordinate: route.at(pos),
                t_frac,
            }
        })
        .collect()
}
