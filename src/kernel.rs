//! CPU mirrors of the per-pixel fragment programs.
//!
//! The physics and lighting passes are pure functions over one texel and its
//! fixed neighbourhood. They are duplicated here, away from any GL object,
//! so the numeric contract of the shader sources in [`crate::shaders`] can
//! be exercised by ordinary unit tests. The constants are tuned visual
//! parameters carried over verbatim; they are not derived from a physical
//! model.

use crate::input::PointerSample;

/// Height channel value of an undisturbed surface.
pub const REST_HEIGHT: f32 = 0.012;
/// Spring constant pulling the height offset back to zero.
pub const ELASTICITY: f32 = 0.016;
/// Per-frame velocity drag.
pub const VISCOSITY: f32 = 0.056;
/// Per-frame decay applied to the reconstructed slope, keeps the
/// finite-difference scheme stable.
pub const SLOPE_DECAY: f32 = 0.976;
/// Radius of the pointer forcing region, in aspect-corrected uv units.
pub const POINTER_RADIUS: f32 = 0.065;
/// Height ceiling of injected energy.
pub const PEAK_HEIGHT: f32 = 0.9;
/// Gain of the injected height term.
pub const FORCE_GAIN: f32 = 2.5;
/// Falloff exponent of the injected height term.
pub const FORCE_EXPONENT: f32 = 1.9;
/// Falloff exponent of the slope damping under the pointer.
pub const SLOPE_DAMP_EXPONENT: f32 = 3.9;
/// Strength of the slope damping under the pointer.
pub const SLOPE_DAMP_FACTOR: f32 = 0.1;

/// Flat ambient light added after shading.
pub const AMBIENT: f32 = 0.045;
/// Blinn specular exponent.
pub const SHININESS: f32 = 2.8;
/// Fixed point light position.
pub const LIGHT_POS: [f32; 3] = [0.0, 1.5, 0.98];
/// Fixed viewer position.
pub const VIEW_POS: [f32; 3] = [0.0, 0.0, 1.2];

const RECIPROCAL_PI: f32 = 0.318_309_88;

/// One simulation texel: accumulated slope, height and vertical velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Texel {
    pub nx: f32,
    pub ny: f32,
    pub height: f32,
    pub velocity: f32,
}

impl Texel {
    /// The value the seed pass writes into both targets.
    pub const REST: Texel = Texel {
        nx: 0.0,
        ny: 0.0,
        height: REST_HEIGHT,
        velocity: 0.0,
    };
}

/// A texel and its four axis neighbours, already clamped to the field edge.
#[derive(Clone, Copy)]
pub struct Neighborhood {
    pub center: Texel,
    pub left: Texel,
    pub right: Texel,
    pub up: Texel,
    pub down: Texel,
}

fn dot3(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn sub3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn length3(a: [f32; 3]) -> f32 {
    dot3(a, a).sqrt()
}

fn normalize3(a: [f32; 3]) -> [f32; 3] {
    let len = length3(a);
    [a[0] / len, a[1] / len, a[2] / len]
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// GLSL-style fract, always in [0, 1).
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Distance from `p` to the segment `a`→`b`.
///
/// A zero-length segment degenerates to the point distance.
pub fn dist_to_segment(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    let v = [b[0] - a[0], b[1] - a[1]];
    let w = [p[0] - a[0], p[1] - a[1]];

    let c1 = w[0] * v[0] + w[1] * v[1];
    let c2 = v[0] * v[0] + v[1] * v[1];

    if c1 <= 0.0 || c2 <= 0.0 {
        return (w[0] * w[0] + w[1] * w[1]).sqrt();
    }

    let t = (c1 / c2).min(1.0);
    let dx = p[0] - (a[0] + t * v[0]);
    let dy = p[1] - (a[1] + t * v[1]);
    (dx * dx + dy * dy).sqrt()
}

/// One physics step for a single texel, mirroring the physics fragment
/// program. `uv` is the texel center in [0, 1]².
pub fn step_texel(
    n: &Neighborhood,
    uv: [f32; 2],
    aspect: f32,
    pointer: PointerSample,
    prev_pointer: PointerSample,
) -> Texel {
    let h = n.center;

    // damped spring on the height offset
    let mut vel = h.velocity;
    vel += -(h.height - REST_HEIGHT) * ELASTICITY - vel * VISCOSITY;

    // central height differences plus accumulated neighbour slope
    let dr = h.height - n.right.height;
    let dl = h.height - n.left.height;
    let du = h.height - n.up.height;
    let dd = h.height - n.down.height;

    let mut sx = (dr - dl) + n.right.nx + n.left.nx + n.up.nx + n.down.nx;
    let mut sy = (du - dd) + n.right.ny + n.left.ny + n.up.ny + n.down.ny;
    sx *= SLOPE_DECAY;
    sy *= SLOPE_DECAY;

    // height contribution of the neighbour slopes along the inward axes
    let lift = n.left.nx - n.right.nx + n.down.ny - n.up.ny;

    let mut fx = sx * 0.25;
    let mut fy = sy * 0.25;
    let mut fz = lift * 0.25 + h.height + vel;

    if pointer.active {
        let dist = dist_to_segment(
            [prev_pointer.x * aspect, prev_pointer.y],
            [pointer.x * aspect, pointer.y],
            [uv[0] * aspect, uv[1]],
        );

        if dist <= POINTER_RADIUS {
            let t = (POINTER_RADIUS - dist) / POINTER_RADIUS;
            fz += t.abs().powf(FORCE_EXPONENT) * PEAK_HEIGHT * FORCE_GAIN;
            let damp = t.abs().powf(SLOPE_DAMP_EXPONENT) * SLOPE_DAMP_FACTOR;
            fx -= fx * damp;
            fy -= fy * damp;
            fz = fz.min(PEAK_HEIGHT);
        }
    }

    Texel {
        nx: fx.clamp(-1.0, 1.0),
        ny: fy.clamp(-1.0, 1.0),
        height: fz.clamp(-1.0, 1.0),
        velocity: vel.clamp(-1.0, 1.0),
    }
}

/// Shade one texel, mirroring the lighting fragment program (without the
/// dither term, which is applied separately).
pub fn shade_texel(state: Texel, uv: [f32; 2]) -> [f32; 3] {
    let n = [state.nx, state.ny, state.height];
    let frag_pos = [2.0 * uv[0] - 1.0, 2.0 * uv[1] - 1.0, n[2]];

    let l = normalize3(sub3(LIGHT_POS, frag_pos));
    let v = normalize3(sub3(VIEW_POS, frag_pos));
    let half_vec = normalize3([l[0] + v[0], l[1] + v[1], l[2] + v[2]]);
    let shading_normal = [n[0], n[1], n[2] / 2.0 + 0.28];

    let diffuse = dot3(shading_normal, l).max(0.0);
    let spec = dot3(normalize3(n), half_vec).clamp(0.0, 1.0);

    let attenuation = 1.0 - length3(sub3(LIGHT_POS, frag_pos)) / 3.1;
    let diffuse_term = diffuse * 0.3 * attenuation;

    let reflected = RECIPROCAL_PI * (SHININESS * 0.5 + 1.0) * spec.powf(SHININESS);
    let spec_term = reflected * 0.6 * attenuation.powi(3);

    let base = diffuse_term + spec_term;
    let mut color = [base, base, base];

    let diffuse_len = length3([diffuse_term, diffuse_term, diffuse_term]);
    color[0] = mix(color[0] * 1.28, color[0], diffuse_len * 1.2 / 3.0);

    [color[0] + AMBIENT, color[1] + AMBIENT, color[2] + AMBIENT]
}

/// Spatial hash driving the dither pattern.
pub fn hash(p: [f32; 2]) -> f32 {
    fract((p[0] * 12.9898 + p[1] * 78.233).sin() * 43758.5453)
}

/// Perturb a color by ±0.25/255 per channel to mask banding.
pub fn dither(color: [f32; 3], frag_coord: [f32; 2]) -> [f32; 3] {
    let grid = hash(frag_coord);
    let base = [0.25 / 255.0, -0.25 / 255.0, 0.25 / 255.0];

    let mut out = color;
    for (channel, shift) in out.iter_mut().zip(base) {
        *channel += mix(2.0 * shift, -2.0 * shift, grid);
    }
    out
}

/// A CPU-side simulation field with clamp-to-edge sampling, the test stand
/// for [`step_texel`].
#[derive(Clone)]
pub struct Field {
    width: usize,
    height: usize,
    texels: Vec<Texel>,
}

impl Field {
    /// A field of the given size, uniformly at rest.
    pub fn new(width: usize, height: usize) -> Field {
        Field {
            width,
            height,
            texels: vec![Texel::REST; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn texels(&self) -> &[Texel] {
        &self.texels
    }

    /// Sample with clamp-to-edge semantics, like the GPU targets.
    pub fn get(&self, x: isize, y: isize) -> Texel {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.texels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, texel: Texel) {
        self.texels[y * self.width + x] = texel;
    }

    /// Advance the whole field by one frame.
    pub fn step(&self, pointer: PointerSample, prev_pointer: PointerSample) -> Field {
        let aspect = self.width as f32 / self.height as f32;
        let mut next = Field::new(self.width, self.height);

        for y in 0..self.height {
            for x in 0..self.width {
                let n = Neighborhood {
                    center: self.get(x as isize, y as isize),
                    left: self.get(x as isize - 1, y as isize),
                    right: self.get(x as isize + 1, y as isize),
                    up: self.get(x as isize, y as isize + 1),
                    down: self.get(x as isize, y as isize - 1),
                };
                let uv = [
                    (x as f32 + 0.5) / self.width as f32,
                    (y as f32 + 0.5) / self.height as f32,
                ];
                next.set(x, y, step_texel(&n, uv, aspect, pointer, prev_pointer));
            }
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: PointerSample = PointerSample { x: 0.0, y: 0.0, active: false };

    fn press(x: f32, y: f32) -> PointerSample {
        PointerSample { x, y, active: true }
    }

    fn rest_neighborhood() -> Neighborhood {
        Neighborhood {
            center: Texel::REST,
            left: Texel::REST,
            right: Texel::REST,
            up: Texel::REST,
            down: Texel::REST,
        }
    }

    /// Deterministic pseudo-random values in [-1, 1].
    struct Lcg(u32);

    impl Lcg {
        fn next(&mut self) -> f32 {
            self.0 = self.0.wrapping_mul(1664525).wrapping_add(1013904223);
            (self.0 >> 8) as f32 / (1 << 24) as f32 * 2.0 - 1.0
        }
    }

    #[test]
    fn segment_distance_matches_on_axis() {
        let a = [0.0, 0.0];
        let b = [1.0, 0.0];

        assert!(dist_to_segment(a, b, [0.5, 0.0]).abs() < 1e-6);
        assert!((dist_to_segment(a, b, [0.5, 1.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = [0.0, 0.0];
        let b = [1.0, 0.0];

        assert!((dist_to_segment(a, b, [2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!((dist_to_segment(a, b, [-3.0, 0.0]) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn zero_length_segment_is_point_distance() {
        let p = [0.3, 0.4];
        let d = dist_to_segment([0.0, 0.0], [0.0, 0.0], p);

        assert!((d - 0.5).abs() < 1e-6);
        assert!(d.is_finite());
    }

    #[test]
    fn rest_field_is_a_fixed_point() {
        let mut field = Field::new(8, 6);

        for _ in 0..4 {
            field = field.step(IDLE, IDLE);
        }

        for texel in field.texels() {
            assert_eq!(*texel, Texel::REST);
        }
    }

    #[test]
    fn outputs_stay_clamped() {
        let mut field = Field::new(10, 10);
        let mut rng = Lcg(0x2545_f491);

        for y in 0..10 {
            for x in 0..10 {
                field.set(x, y, Texel {
                    nx: rng.next() * 2.0,
                    ny: rng.next() * 2.0,
                    height: rng.next() * 2.0,
                    velocity: rng.next() * 2.0,
                });
            }
        }

        let next = field.step(press(0.5, 0.5), press(0.2, 0.4));

        for texel in next.texels() {
            assert!(texel.nx.abs() <= 1.0);
            assert!(texel.ny.abs() <= 1.0);
            assert!(texel.height.abs() <= 1.0);
            assert!(texel.velocity.abs() <= 1.0);
        }
    }

    #[test]
    fn slope_sum_contracts_over_uniform_heights() {
        let mut field = Field::new(12, 12);
        let mut rng = Lcg(7);

        for y in 0..12 {
            for x in 0..12 {
                field.set(x, y, Texel {
                    nx: rng.next(),
                    ny: rng.next(),
                    ..Texel::REST
                });
            }
        }

        let before: f32 = field
            .texels()
            .iter()
            .map(|t| t.nx.abs() + t.ny.abs())
            .sum();

        let after: f32 = field
            .step(IDLE, IDLE)
            .texels()
            .iter()
            .map(|t| t.nx.abs() + t.ny.abs())
            .sum();

        assert!(after <= before * SLOPE_DECAY + 1e-4);
    }

    #[test]
    fn impulse_decays_without_forcing() {
        let mut field = Field::new(16, 16);
        field.set(8, 8, Texel { height: PEAK_HEIGHT, ..Texel::REST });

        let offset_sum = |f: &Field| -> f32 {
            f.texels()
                .iter()
                .map(|t| (t.height - REST_HEIGHT).abs())
                .sum()
        };
        let initial = offset_sum(&field);

        for _ in 0..400 {
            field = field.step(IDLE, IDLE);
        }

        assert!(offset_sum(&field) < initial * 0.5);
        for texel in field.texels() {
            assert!(texel.height.abs() <= 1.0);
            assert!(texel.velocity.abs() <= 1.0);
        }
    }

    #[test]
    fn pointer_forcing_saturates_at_peak() {
        let pointer = press(0.5, 0.5);
        let out = step_texel(&rest_neighborhood(), [0.5, 0.5], 1.0, pointer, pointer);

        assert!((out.height - PEAK_HEIGHT).abs() < 1e-6);
        assert_eq!(out.nx, 0.0);
        assert_eq!(out.ny, 0.0);
    }

    #[test]
    fn pointer_outside_radius_is_inert() {
        let pointer = press(0.0, 0.0);
        let out = step_texel(&rest_neighborhood(), [0.5, 0.5], 1.0, pointer, pointer);

        assert_eq!(out, Texel::REST);
    }

    #[test]
    fn forcing_damps_the_slope() {
        let sloped = Texel { nx: 0.4, ..Texel::REST };
        let n = Neighborhood {
            center: Texel::REST,
            left: sloped,
            right: sloped,
            up: sloped,
            down: sloped,
        };

        let free = step_texel(&n, [0.5, 0.5], 1.0, IDLE, IDLE);
        let pointer = press(0.5, 0.5);
        let forced = step_texel(&n, [0.5, 0.5], 1.0, pointer, pointer);

        let expected_free = 4.0 * 0.4 * SLOPE_DECAY * 0.25;
        assert!((free.nx - expected_free).abs() < 1e-5);
        assert!((forced.nx - expected_free * (1.0 - SLOPE_DAMP_FACTOR)).abs() < 1e-5);
        assert!(forced.nx < free.nx);
    }

    #[test]
    fn rest_shading_keeps_ambient_floor() {
        let color = shade_texel(Texel::REST, [0.5, 0.5]);

        for channel in color {
            assert!(channel.is_finite());
            assert!(channel >= AMBIENT - 1e-6);
            assert!(channel <= 2.0);
        }
    }

    #[test]
    fn dither_is_bounded_and_deterministic() {
        let color = [0.3, 0.4, 0.5];
        let coords = [[0.5, 0.5], [100.5, 240.5], [7.5, 3.5]];

        for coord in coords {
            let shifted = dither(color, coord);
            for (out, original) in shifted.iter().zip(color) {
                assert!((out - original).abs() <= 0.5 / 255.0 + 1e-7);
            }
            assert_eq!(shifted, dither(color, coord));
        }
    }

    #[test]
    fn hash_stays_in_unit_interval() {
        for i in 0..64 {
            let value = hash([i as f32 * 13.7 + 0.5, i as f32 * 71.3 + 0.5]);
            assert!((0.0..1.0).contains(&value));
        }
    }
}
