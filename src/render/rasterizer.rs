//! Scanline convex-polygon fill with an integer z-buffer.
//!
//! # Algorithm
//!
//! A convex polygon has exactly one left and one right boundary per scanline.
//! The fill walks the polygon's edge chain twice, starting at the vertex with
//! the lowest Y: once in each rotational direction, until both walks reach the
//! vertex with the highest Y. Each walk caches, per scanline, the linear pixel
//! offset (`x + y * width`) where its boundary crosses that row, and for the
//! depth-tested variant an interpolated depth value alongside it.
//!
//! Edge interpolation runs in fixed point: the starting value is shifted left
//! by a constant, the per-scanline step is the shifted delta divided by the
//! rows spanned, and values are shifted back down on store. Incremental
//! floating-point stepping would drift over long edges; the integer
//! accumulator cannot.
//!
//! With both boundary caches filled, each scanline is a half-open span
//! `[offset0, offset1)`. Which cache holds the left boundary can differ per
//! polygon (and winding), so the smaller offset is taken as left at fill time.
//! The depth variant steps depth linearly across the span and writes a pixel
//! only when its depth is strictly closer than the stored one.
//!
//! Callers must pass a convex, non-self-intersecting polygon with vertices in
//! rotational order; the fill does not detect violations. A zero-height
//! polygon fills nothing by design.

use std::mem;

/// Integer screen-space vertex: pixel coordinates plus interpolation depth.
///
/// The homogeneous w from projection only exists transiently while mapping to
/// screen space and is not carried here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenVertex {
    pub x: i32,
    pub y: i32,
    pub depth: i32,
}

impl ScreenVertex {
    pub const fn new(x: i32, y: i32, depth: i32) -> Self {
        Self { x, y, depth }
    }
}

/// Fixed-point bits used for offset interpolation. Depth interpolation uses
/// shift 0 (plain integer steps), as the depth range is already large.
const OFFSET_SHIFT: u32 = 32;

/// Band that vertex coordinates and pixel offsets are clamped to before any
/// edge arithmetic. A vertex projected with a near-zero w saturates the
/// integer cast during screen mapping; unclamped, `x + y * pitch` and the
/// shifted interpolation deltas overflow. With |value| <= 2^29 every
/// fixed-point intermediate fits in i64.
const COORD_LIMIT: i32 = 1 << 29;

/// Caches per-scanline boundary values for one edge chain.
///
/// `v0`/`v1` are the values at scanlines `y_min`/`y_max`. Writes are clamped
/// to the cache range; skipped rows still advance the accumulator so stored
/// values land on the same line. Exact at every stored scanline for deltas
/// that divide evenly, and within one unit otherwise.
fn interpolate<const SHIFT: u32>(cache: &mut [i32], v0: i32, v1: i32, y_min: i32, y_max: i32) {
    if y_max <= y_min {
        return;
    }
    let mut value = (v0 as i64) << SHIFT;
    let step = ((v1 as i64 - v0 as i64) << SHIFT) / (y_max as i64 - y_min as i64);

    let lo = y_min.max(0);
    let hi = y_max.min(cache.len() as i32 - 1);
    if hi < lo {
        return;
    }
    value += step * (lo as i64 - y_min as i64);
    for slot in &mut cache[lo as usize..=hi as usize] {
        *slot = (value >> SHIFT) as i32;
        value += step;
    }
}

/// Scanline rasterizer with a per-pixel integer depth buffer.
///
/// Owns its depth buffer and four interpolation caches, all sized to the
/// buffer passed at construction and allocated exactly once; fill calls never
/// allocate. Instances share no state, so differently sized buffers each get
/// their own rasterizer.
pub struct ScanlineRasterizer {
    width: i32,
    height: i32,
    color: u32,
    depth_buffer: Vec<i32>,
    offset_cache0: Vec<i32>,
    offset_cache1: Vec<i32>,
    depth_cache0: Vec<i32>,
    depth_cache1: Vec<i32>,
}

impl ScanlineRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            color: 0xFFFF_FFFF,
            depth_buffer: vec![i32::MAX; (width * height) as usize],
            offset_cache0: vec![0; height as usize],
            offset_cache1: vec![0; height as usize],
            depth_cache0: vec![0; height as usize],
            depth_cache1: vec![0; height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    /// Sets the fill color used by subsequent polygon fills.
    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    /// Resets every depth entry to the far sentinel. Call once per frame
    /// before the first fill.
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(i32::MAX);
    }

    /// Stored depth at a pixel, if it is inside the buffer.
    pub fn depth_at(&self, x: i32, y: i32) -> Option<i32> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some(self.depth_buffer[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Locates the polygon vertices with minimum and maximum Y.
    ///
    /// Returns `(start, start_y, end, end_y)` as indices into `polygon`. Ties
    /// keep the earliest index, matching the chain-walk termination below.
    fn find_y_extremes(
        vertices: &[ScreenVertex],
        polygon: &[usize],
    ) -> (usize, i32, usize, i32) {
        let mut start = 0;
        let mut end = 0;
        let mut start_y = vertices[polygon[0]].y;
        let mut end_y = start_y;

        for (i, &vi) in polygon.iter().enumerate().skip(1) {
            let y = vertices[vi].y;
            if y < start_y {
                start_y = y;
                start = i;
            } else if y > end_y {
                end_y = y;
                end = i;
            }
        }
        (start, start_y, end, end_y)
    }

    /// Walks one edge chain from the min-Y vertex to the max-Y vertex,
    /// filling the per-scanline offset cache (and depth cache when given).
    ///
    /// `backward` selects the rotational direction; with one walk per
    /// direction the two caches cover both polygon boundaries for every
    /// scanline in between. Returns the chain's final offset, used by the
    /// fill loop as a stop marker.
    #[allow(clippy::too_many_arguments)]
    fn cache_edge_chain(
        offsets: &mut [i32],
        mut depths: Option<&mut [i32]>,
        vertices: &[ScreenVertex],
        polygon: &[usize],
        pitch: i32,
        start: usize,
        end: usize,
        backward: bool,
    ) -> i32 {
        let last = polygon.len() - 1;
        let advance = |i: usize| {
            if backward {
                if i == 0 {
                    last
                } else {
                    i - 1
                }
            } else if i == last {
                0
            } else {
                i + 1
            }
        };
        // Coordinates and offsets are clamped to the i64-safe band; saturated
        // screen-mapping casts otherwise overflow the offset product.
        let vertex = |i: usize| {
            let v = vertices[polygon[i]];
            ScreenVertex::new(
                v.x.clamp(-COORD_LIMIT, COORD_LIMIT),
                v.y.clamp(-COORD_LIMIT, COORD_LIMIT),
                v.depth,
            )
        };
        let offset = |v: ScreenVertex| {
            (v.x as i64 + v.y as i64 * pitch as i64)
                .clamp(-(COORD_LIMIT as i64), COORD_LIMIT as i64) as i32
        };

        let mut current = start;
        let mut next = advance(start);

        let mut v0 = vertex(current);
        let mut v1 = vertex(next);
        let mut o0 = offset(v0);
        let mut o1 = offset(v1);

        loop {
            interpolate::<OFFSET_SHIFT>(offsets, o0, o1, v0.y, v1.y);
            if let Some(cache) = depths.as_deref_mut() {
                interpolate::<0>(cache, v0.depth, v1.depth, v0.y, v1.y);
            }

            current = advance(current);
            if current == end {
                break;
            }
            next = advance(next);

            v0 = v1;
            v1 = vertex(next);
            o0 = o1;
            o1 = offset(v1);
        }
        o1
    }

    /// Fills a convex polygon without depth testing: every pixel in each
    /// scanline span is written unconditionally.
    pub fn fill_convex_polygon(
        &mut self,
        frame: &mut [u32],
        vertices: &[ScreenVertex],
        polygon: &[usize],
    ) {
        debug_assert!(polygon.len() >= 3, "polygon needs at least 3 vertices");
        debug_assert_eq!(frame.len(), self.depth_buffer.len());
        if polygon.len() < 3 {
            return;
        }

        let pitch = self.width;
        let (start, start_y, end, end_y) = Self::find_y_extremes(vertices, polygon);
        if start_y == end_y {
            return;
        }

        let mut end_offset = Self::cache_edge_chain(
            &mut self.offset_cache0,
            None,
            vertices,
            polygon,
            pitch,
            start,
            end,
            true,
        );
        let forward_end = Self::cache_edge_chain(
            &mut self.offset_cache1,
            None,
            vertices,
            polygon,
            pitch,
            start,
            end,
            false,
        );
        end_offset = end_offset.max(forward_end);

        for y in start_y.max(0)..end_y.min(self.height) {
            let mut o0 = self.offset_cache0[y as usize];
            let mut o1 = self.offset_cache1[y as usize];
            if o1 < o0 {
                mem::swap(&mut o0, &mut o1);
            }
            if o0 < o1 {
                let row_start = y * pitch;
                let begin = o0.max(row_start);
                let stop = o1.min(row_start + pitch);
                for offset in begin..stop {
                    frame[offset as usize] = self.color;
                }
                if o1 > end_offset {
                    break;
                }
            }
        }
    }

    /// Fills a convex polygon with per-pixel depth testing.
    ///
    /// Depth steps linearly across each span (integer division of the span's
    /// depth delta by its width). A pixel is written, and its depth stored,
    /// only when the interpolated depth is strictly smaller than the value in
    /// the depth buffer; equal depth never overwrites.
    pub fn fill_convex_polygon_z(
        &mut self,
        frame: &mut [u32],
        vertices: &[ScreenVertex],
        polygon: &[usize],
    ) {
        debug_assert!(polygon.len() >= 3, "polygon needs at least 3 vertices");
        debug_assert_eq!(frame.len(), self.depth_buffer.len());
        if polygon.len() < 3 {
            return;
        }

        let pitch = self.width;
        let (start, start_y, end, end_y) = Self::find_y_extremes(vertices, polygon);
        if start_y == end_y {
            return;
        }

        let mut end_offset = Self::cache_edge_chain(
            &mut self.offset_cache0,
            Some(&mut self.depth_cache0),
            vertices,
            polygon,
            pitch,
            start,
            end,
            true,
        );
        let forward_end = Self::cache_edge_chain(
            &mut self.offset_cache1,
            Some(&mut self.depth_cache1),
            vertices,
            polygon,
            pitch,
            start,
            end,
            false,
        );
        end_offset = end_offset.max(forward_end);

        for y in start_y.max(0)..end_y.min(self.height) {
            let mut o0 = self.offset_cache0[y as usize];
            let mut o1 = self.offset_cache1[y as usize];
            let mut z0 = self.depth_cache0[y as usize];
            let mut z1 = self.depth_cache1[y as usize];
            if o1 < o0 {
                mem::swap(&mut o0, &mut o1);
                mem::swap(&mut z0, &mut z1);
            }
            if o0 < o1 {
                // Depth steps in i64: a span between a near and a saturated
                // vertex can carry a delta wider than i32.
                let z_step = (z1 as i64 - z0 as i64) / (o1 as i64 - o0 as i64);

                // Clamp the span to its row; skipped pixels still advance the
                // interpolated depth.
                let row_start = y * pitch;
                let begin = o0.max(row_start);
                let stop = o1.min(row_start + pitch);
                let mut z = z0 as i64 + z_step * (begin as i64 - o0 as i64);

                for offset in begin..stop {
                    let index = offset as usize;
                    if z < self.depth_buffer[index] as i64 {
                        self.depth_buffer[index] = z as i32;
                        frame[index] = self.color;
                    }
                    z += z_step;
                }
                if o1 > end_offset {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u32 = 800;
    const H: u32 = 600;
    const BG: u32 = 0;

    fn frame() -> Vec<u32> {
        vec![BG; (W * H) as usize]
    }

    fn triangle(points: [(i32, i32, i32); 3]) -> Vec<ScreenVertex> {
        points
            .iter()
            .map(|&(x, y, depth)| ScreenVertex::new(x, y, depth))
            .collect()
    }

    #[test]
    fn fixed_point_interpolation_hits_exact_midpoint() {
        let mut cache = vec![0i32; 16];
        interpolate::<OFFSET_SHIFT>(&mut cache, 100, 200, 0, 10);
        assert_eq!(cache[0], 100);
        assert_eq!(cache[5], 150);
        assert_eq!(cache[10], 200);
    }

    #[test]
    fn interpolation_clamps_to_cache_range() {
        let mut cache = vec![0i32; 10];
        // Edge spanning rows -5..15 on a 10-row cache; rows 0..=9 must hold
        // the same values an unclamped interpolation would produce.
        interpolate::<OFFSET_SHIFT>(&mut cache, -50, 150, -5, 15);
        assert_eq!(cache[0], 0);
        assert_eq!(cache[5], 50);
        assert_eq!(cache[9], 90);
    }

    #[test]
    fn two_triangles_fill_the_whole_buffer_exactly_once() {
        let mut rasterizer = ScanlineRasterizer::new(W, H);

        let w = W as i32;
        let h = H as i32;
        let upper = triangle([(0, 0, 10), (w, 0, 10), (w, h, 10)]);
        let lower = triangle([(0, 0, 10), (w, h, 10), (0, h, 10)]);

        // Separate frames per triangle so an overlap along the shared
        // diagonal cannot hide behind an overwrite.
        let mut first = frame();
        rasterizer.set_color(0xFF11_1111);
        rasterizer.fill_convex_polygon(&mut first, &upper, &[0, 1, 2]);
        let mut second = frame();
        rasterizer.set_color(0xFF22_2222);
        rasterizer.fill_convex_polygon(&mut second, &lower, &[0, 1, 2]);

        for (i, (&a, &b)) in first.iter().zip(&second).enumerate() {
            let writes = (a != BG) as u32 + (b != BG) as u32;
            assert_eq!(
                writes,
                1,
                "pixel {i} (x={}, y={}) must belong to exactly one triangle",
                i as u32 % W,
                i as u32 / W
            );
        }
    }

    #[test]
    fn depth_test_keeps_closest_regardless_of_draw_order() {
        let near = triangle([(100, 50, 10), (300, 50, 10), (200, 250, 10)]);
        let far = triangle([(150, 80, 5000), (350, 80, 5000), (250, 280, 5000)]);

        let render = |first: (&[ScreenVertex], u32), second: (&[ScreenVertex], u32)| {
            let mut rasterizer = ScanlineRasterizer::new(W, H);
            let mut frame = vec![BG; (W * H) as usize];
            rasterizer.clear_depth();
            rasterizer.set_color(first.1);
            rasterizer.fill_convex_polygon_z(&mut frame, first.0, &[0, 1, 2]);
            rasterizer.set_color(second.1);
            rasterizer.fill_convex_polygon_z(&mut frame, second.0, &[0, 1, 2]);
            frame
        };

        let near_first = render((&near, 0xFFAA_0000), (&far, 0xFF00_BB00));
        let far_first = render((&far, 0xFF00_BB00), (&near, 0xFFAA_0000));
        assert_eq!(near_first, far_first);
    }

    #[test]
    fn equal_depth_does_not_overwrite() {
        let mut rasterizer = ScanlineRasterizer::new(W, H);
        let mut frame = frame();
        rasterizer.clear_depth();

        let tri = triangle([(100, 100, 42), (200, 100, 42), (150, 200, 42)]);
        rasterizer.set_color(0xFF12_3456);
        rasterizer.fill_convex_polygon_z(&mut frame, &tri, &[0, 1, 2]);
        rasterizer.set_color(0xFF65_4321);
        rasterizer.fill_convex_polygon_z(&mut frame, &tri, &[0, 1, 2]);

        assert!(frame.iter().all(|&p| p != 0xFF65_4321));
        assert!(frame.iter().any(|&p| p == 0xFF12_3456));
    }

    #[test]
    fn plain_fill_writes_unconditionally() {
        let mut rasterizer = ScanlineRasterizer::new(W, H);
        let mut frame = frame();

        let tri = triangle([(100, 100, 0), (200, 100, 0), (150, 200, 0)]);
        rasterizer.set_color(0xFF11_0000);
        rasterizer.fill_convex_polygon(&mut frame, &tri, &[0, 1, 2]);
        rasterizer.set_color(0xFF22_0000);
        rasterizer.fill_convex_polygon(&mut frame, &tri, &[0, 1, 2]);

        assert!(frame.iter().all(|&p| p != 0xFF11_0000));
        assert!(frame.iter().any(|&p| p == 0xFF22_0000));
    }

    #[test]
    fn zero_height_polygon_fills_nothing() {
        let mut rasterizer = ScanlineRasterizer::new(W, H);
        let mut frame = frame();
        rasterizer.clear_depth();

        let flat = triangle([(10, 40, 0), (90, 40, 0), (50, 40, 0)]);
        rasterizer.set_color(0xFFFF_0000);
        rasterizer.fill_convex_polygon_z(&mut frame, &flat, &[0, 1, 2]);
        rasterizer.fill_convex_polygon(&mut frame, &flat, &[0, 1, 2]);

        assert!(frame.iter().all(|&p| p == BG));
    }

    #[test]
    fn spans_clamp_to_buffer_bounds() {
        let mut rasterizer = ScanlineRasterizer::new(100, 100);
        let mut frame = vec![BG; 100 * 100];
        rasterizer.clear_depth();

        // Extends past every edge of the 100x100 buffer.
        let tri = triangle([(-40, -40, 10), (140, -40, 10), (50, 140, 10)]);
        rasterizer.set_color(0xFFDD_DDDD);
        rasterizer.fill_convex_polygon_z(&mut frame, &tri, &[0, 1, 2]);

        let written = frame.iter().filter(|&&p| p != BG).count();
        assert!(written > 0);
        assert!(written <= 100 * 100);
    }

    #[test]
    fn depth_buffer_records_written_depths() {
        let mut rasterizer = ScanlineRasterizer::new(W, H);
        let mut frame = frame();
        rasterizer.clear_depth();

        let tri = triangle([(100, 100, 77), (300, 100, 77), (200, 300, 77)]);
        rasterizer.set_color(0xFF01_0203);
        rasterizer.fill_convex_polygon_z(&mut frame, &tri, &[0, 1, 2]);

        assert_eq!(rasterizer.depth_at(200, 150), Some(77));
        assert_eq!(rasterizer.depth_at(0, 0), Some(i32::MAX));
        assert_eq!(rasterizer.depth_at(-1, 0), None);
    }

    #[test]
    fn saturated_coordinates_do_not_overflow() {
        let mut rasterizer = ScanlineRasterizer::new(W, H);
        let mut frame = frame();
        rasterizer.clear_depth();

        // A vertex whose clip w was clamped near zero saturates the integer
        // cast during screen mapping; the fill must stay in bounds and must
        // not overflow the offset arithmetic.
        let tri = triangle([
            (100, 100, 10),
            (300, 120, 10),
            (i32::MAX, i32::MAX, i32::MAX),
        ]);
        rasterizer.set_color(0xFF99_0000);
        rasterizer.fill_convex_polygon_z(&mut frame, &tri, &[0, 1, 2]);
        rasterizer.fill_convex_polygon(&mut frame, &tri, &[0, 1, 2]);

        let mirrored = triangle([
            (100, 100, 10),
            (300, 120, 10),
            (i32::MIN, i32::MIN, i32::MIN),
        ]);
        rasterizer.fill_convex_polygon_z(&mut frame, &mirrored, &[0, 1, 2]);

        assert!(frame.len() == (W * H) as usize);
    }

    #[test]
    fn quad_polygon_is_supported() {
        let mut rasterizer = ScanlineRasterizer::new(W, H);
        let mut frame = frame();
        rasterizer.clear_depth();

        let quad = vec![
            ScreenVertex::new(10, 10, 3),
            ScreenVertex::new(110, 10, 3),
            ScreenVertex::new(110, 110, 3),
            ScreenVertex::new(10, 110, 3),
        ];
        rasterizer.set_color(0xFF31_4159);
        rasterizer.fill_convex_polygon_z(&mut frame, &quad, &[0, 1, 2, 3]);

        let written = frame.iter().filter(|&&p| p == 0xFF31_4159).count();
        assert_eq!(written, 100 * 100);
    }
}
