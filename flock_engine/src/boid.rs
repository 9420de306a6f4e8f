use std::fmt;

use glam::f32::Vec2;

use crate::{
    error::BoidError,
    math_helpers::{limit_speed, wrap_position},
    options::{Boundary, RuleFactors, WindowSize},
};

/// An RGBA colour, every channel in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: u8::MAX }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Builds a colour from 3 (opaque) or 4 raw channels.
    pub fn from_channels(channels: &[i32]) -> Result<Self, BoidError> {
        if !(3..=4).contains(&channels.len()) {
            return Err(BoidError::ColorArity(channels.len()));
        }

        let mut rgba = [u8::MAX; 4];
        for (index, (&value, slot)) in channels.iter().zip(rgba.iter_mut()).enumerate() {
            *slot = u8::try_from(value).map_err(|_| BoidError::ColorChannel { index, value })?;
        }

        let [r, g, b, a] = rgba;
        Ok(Color { r, g, b, a })
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl TryFrom<&[i32]> for Color {
    type Error = BoidError;

    fn try_from(channels: &[i32]) -> Result<Self, Self::Error> {
        Color::from_channels(channels)
    }
}

/// A single member of the flock.
///
/// Position and velocity are free simulation state, colour and size are
/// validated once at construction and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    /// identity within the flock, rules never count a boid as its own neighbour
    pub id: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    color: Color,
    size: u32,
}

impl Boid {
    /// Creates a new [`Boid`].
    ///
    /// Fails if `size` is zero.
    pub fn new(
        id: usize,
        position: Vec2,
        velocity: Vec2,
        color: Color,
        size: u32,
    ) -> Result<Self, BoidError> {
        if size == 0 {
            return Err(BoidError::Size(size));
        }

        Ok(Boid {
            id,
            position,
            velocity,
            color,
            size,
        })
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Runs cohesion, separation and alignment in that order against `others`.
    ///
    /// Every rule reads the velocity left behind by the previous one, while
    /// `others` stays untouched.
    pub fn apply_rules(&mut self, others: &[Boid], factors: &RuleFactors) {
        self.velocity += self.cohesion(others, factors.cohesion_factor, factors.visual_range);
        self.velocity += self.separation(others, factors.separation, factors.avoid_factor);
        self.velocity += self.alignment(others, factors.alignment_factor, factors.visual_range);
    }

    /// Steers toward the centre of mass of the other boids in visual range.
    pub fn cohesion(&self, others: &[Boid], cohesion_factor: f32, visual_range: f32) -> Vec2 {
        let mut center = Vec2::ZERO;
        let mut count = 0;

        for other in self.visible(others, visual_range) {
            center += other.position;
            count += 1;
        }

        if count > 0 {
            center /= count as f32;
            (center - self.position) * cohesion_factor
        } else {
            Vec2::ZERO
        }
    }

    /// Steers away from every other boid closer than `separation`.
    ///
    /// The offsets are summed raw and scaled once, so the push grows with the
    /// crowding rather than compounding per neighbour.
    pub fn separation(&self, others: &[Boid], separation: f32, avoid_factor: f32) -> Vec2 {
        let delta = self
            .visible(others, separation)
            .fold(Vec2::ZERO, |delta, other| {
                delta + (self.position - other.position)
            });

        delta * avoid_factor
    }

    /// Nudges velocity toward the mean velocity of the other boids in visual range.
    pub fn alignment(&self, others: &[Boid], alignment_factor: f32, visual_range: f32) -> Vec2 {
        let mut avg = Vec2::ZERO;
        let mut count = 0;

        for other in self.visible(others, visual_range) {
            avg += other.velocity;
            count += 1;
        }

        if count > 0 {
            avg /= count as f32;
            (avg - self.velocity) * alignment_factor
        } else {
            Vec2::ZERO
        }
    }

    /// Other boids strictly closer than `range`.
    fn visible<'a>(&'a self, others: &'a [Boid], range: f32) -> impl Iterator<Item = &'a Boid> + 'a {
        others.iter().filter(move |other| {
            other.id != self.id && self.position.distance(other.position) < range
        })
    }

    pub fn limit_speed(&mut self, max_speed: f32) {
        self.velocity = limit_speed(self.velocity, max_speed);
    }

    pub fn move_by_velocity(&mut self) {
        self.position += self.velocity;
    }

    /// Integrates one tick of movement and applies the boundary policy.
    pub fn update_location(&mut self, boundary: &Boundary, window: &WindowSize) {
        self.move_by_velocity();
        self.boundaries(boundary, window);
    }

    /// Applies the boundary policy to the current position and velocity.
    ///
    /// Bouncing only changes velocity, the position follows on the next move.
    pub fn boundaries(&mut self, boundary: &Boundary, window: &WindowSize) {
        match *boundary {
            Boundary::Wrap => {
                self.position = wrap_position(self.position, window);
            }
            Boundary::Bounce {
                margin,
                turn_factor,
            } => {
                if self.position.x < margin {
                    self.velocity.x += turn_factor;
                } else if self.position.x > window.win_w - margin {
                    self.velocity.x -= turn_factor;
                }

                if self.position.y < margin {
                    self.velocity.y += turn_factor;
                } else if self.position.y > window.win_h - margin {
                    self.velocity.y -= turn_factor;
                }
            }
        }
    }
}

impl fmt::Display for Boid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Color { r, g, b, a } = self.color;
        write!(
            f,
            "Boid(pos=[{}, {}], vel=[{}, {}], color=({}, {}, {}, {}), size={})",
            self.position.x, self.position.y, self.velocity.x, self.velocity.y, r, g, b, a, self.size
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec2;
    use rstest::{fixture, rstest};

    use super::{Boid, Color};
    use crate::{
        error::BoidError,
        options::{get_window_size, Boundary, RuleFactors},
    };

    macro_rules! assert_vec_eq {
        ($x:expr, $y:expr) => {{
            let (x, y): (Vec2, Vec2) = ($x, $y);
            assert_relative_eq!(x.x, y.x, epsilon = 1e-4_f32);
            assert_relative_eq!(x.y, y.y, epsilon = 1e-4_f32);
        }};
    }

    fn boid(id: usize, position: (f32, f32), velocity: (f32, f32)) -> Boid {
        Boid::new(
            id,
            Vec2::from(position),
            Vec2::from(velocity),
            Color::rgb(0, 0, 0),
            1,
        )
        .unwrap()
    }

    #[fixture]
    fn boid_list() -> Vec<Boid> {
        vec![
            boid(0, (0., 0.), (0., 0.)),
            boid(1, (-1., 10.), (4., 5.)),
            boid(2, (1., 10.), (-4., 5.)),
        ]
    }

    #[test]
    fn valid_boid() {
        let b = Boid::new(7, Vec2::new(1., 2.), Vec2::new(3., 4.), Color::rgb(0, 0, 0), 1).unwrap();

        assert_eq!(b.id, 7);
        assert_eq!(b.position, Vec2::new(1., 2.));
        assert_eq!(b.velocity, Vec2::new(3., 4.));
        assert_eq!(b.color(), Color::rgba(0, 0, 0, 255));
        assert_eq!(b.size(), 1);
    }

    #[test]
    fn zero_size_is_rejected() {
        let res = Boid::new(0, Vec2::ZERO, Vec2::ZERO, Color::WHITE, 0);

        assert_eq!(res, Err(BoidError::Size(0)));
    }

    #[rstest]
    #[case(&[0, 0, 0], Color::rgba(0, 0, 0, 255))]
    #[case(&[255, 128, 1], Color::rgba(255, 128, 1, 255))]
    #[case(&[10, 20, 30, 40], Color::rgba(10, 20, 30, 40))]
    fn color_from_valid_channels(#[case] channels: &[i32], #[case] expected: Color) {
        assert_eq!(Color::from_channels(channels), Ok(expected));
    }

    #[rstest]
    #[case(&[0, 0], BoidError::ColorArity(2))]
    #[case(&[-1, 0, 0], BoidError::ColorChannel { index: 0, value: -1 })]
    #[case(&[0, 0, 256], BoidError::ColorChannel { index: 2, value: 256 })]
    #[case(&[0, 0, 0, 0, 0], BoidError::ColorArity(5))]
    fn color_from_invalid_channels(#[case] channels: &[i32], #[case] expected: BoidError) {
        assert_eq!(Color::try_from(channels), Err(expected));
    }

    #[test]
    fn display() {
        let b = boid(0, (1., 2.), (3., 4.));

        assert_eq!(
            b.to_string(),
            "Boid(pos=[1, 2], vel=[3, 4], color=(0, 0, 0, 255), size=1)"
        );
    }

    #[test]
    fn move_by_velocity() {
        let mut b = boid(0, (1., 2.), (3., 4.));
        b.move_by_velocity();

        assert_eq!(b.position, Vec2::new(4., 6.));
        assert_eq!(b.velocity, Vec2::new(3., 4.));
    }

    #[rstest]
    #[case(0, 100., (0., 10.))]
    #[case(1, 100., (5.5, 0.))]
    #[case(1, 5., (6., 5.))]
    fn cohesion(
        boid_list: Vec<Boid>,
        #[case] index: usize,
        #[case] visual_range: f32,
        #[case] expected: (f32, f32),
    ) {
        let mut b = boid_list[index];
        b.velocity += b.cohesion(&boid_list, 1., visual_range);

        assert_vec_eq!(b.velocity, Vec2::from(expected));
    }

    #[test]
    fn cohesion_pulls_toward_mean_of_others() {
        let flock = vec![
            boid(0, (3., 3.), (0., 0.)),
            boid(1, (10., 0.), (0., 0.)),
            boid(2, (0., 10.), (0., 0.)),
            boid(3, (-4., -4.), (0., 0.)),
        ];
        let mean = Vec2::new(6., 6.) / 3.;

        let delta = flock[0].cohesion(&flock, 0.25, 1000.);

        assert_vec_eq!(delta, (mean - flock[0].position) * 0.25);
    }

    #[test]
    fn cohesion_and_alignment_skip_lonely_boid() {
        let flock = vec![boid(0, (0., 0.), (1., 1.)), boid(1, (50., 50.), (-3., 2.))];

        assert_eq!(flock[0].cohesion(&flock, 1., 10.), Vec2::ZERO);
        assert_eq!(flock[0].alignment(&flock, 1., 10.), Vec2::ZERO);
    }

    #[rstest]
    fn avoidance_scales_once_after_summing(boid_list: Vec<Boid>) {
        let flock = boid_list;

        let delta = flock[0].separation(&flock, 20., 0.1);

        assert_vec_eq!(delta, Vec2::new(0., -2.));
    }

    #[test]
    fn avoidance_ignores_self_even_when_alone() {
        let flock = vec![boid(0, (5., 5.), (0., 0.))];

        assert_eq!(flock[0].separation(&flock, 100., 1.), Vec2::ZERO);
    }

    #[rstest]
    fn avoidance_ignores_far_boids(boid_list: Vec<Boid>) {
        let flock = boid_list;

        assert_eq!(flock[0].separation(&flock, 10., 0.1), Vec2::ZERO);
    }

    #[rstest]
    #[case(0, 100., (0., 5.))]
    #[case(1, 100., (-2., 2.5))]
    #[case(1, 5., (-4., 5.))]
    fn alignment(
        boid_list: Vec<Boid>,
        #[case] index: usize,
        #[case] visual_range: f32,
        #[case] expected: (f32, f32),
    ) {
        let mut b = boid_list[index];
        b.velocity += b.alignment(&boid_list, 1., visual_range);

        assert_vec_eq!(b.velocity, Vec2::from(expected));
    }

    #[rstest]
    fn all_rules_in_sequence(boid_list: Vec<Boid>) {
        let factors = RuleFactors {
            cohesion_factor: 1.,
            separation: 20.,
            avoid_factor: 0.1,
            alignment_factor: 1.,
            visual_range: 100.,
        };
        let mut b = boid_list[0];
        b.apply_rules(&boid_list, &factors);

        assert_vec_eq!(b.velocity, Vec2::new(0., 5.));
    }

    #[rstest]
    fn rules_against_single_outsider_repel_with_negative_cohesion(boid_list: Vec<Boid>) {
        let predator = [boid(usize::MAX, (0., 10.), (0., 0.))];
        let b = boid_list[0];

        let delta = b.cohesion(&predator, -2., 1000.);

        assert_vec_eq!(delta, Vec2::new(0., -20.));
    }

    #[test]
    fn limit_speed() {
        let mut b = boid(0, (0., 0.), (6., 8.));
        b.limit_speed(5.);

        assert_vec_eq!(b.velocity, Vec2::new(3., 4.));
    }

    #[test]
    fn wrap_boundary() {
        let mut b = boid(0, (14., 14.), (1., -1.));
        b.boundaries(&Boundary::Wrap, &get_window_size(10, 10));

        assert_eq!(b.position, Vec2::new(4., 4.));
        assert_eq!(b.velocity, Vec2::new(1., -1.));
    }

    #[rstest]
    #[case((0., 0.), (1., 1.))]
    #[case((9., 9.), (1., 1.))]
    #[case((15., 15.), (0., 0.))]
    #[case((0., 30.), (1., -1.))]
    #[case((9., 21.), (1., -1.))]
    #[case((30., 0.), (-1., 1.))]
    #[case((21., 9.), (-1., 1.))]
    #[case((30., 30.), (-1., -1.))]
    #[case((21., 21.), (-1., -1.))]
    fn bounce_boundary(#[case] position: (f32, f32), #[case] expected: (f32, f32)) {
        let mut b = boid(0, position, (0., 0.));
        let bounce = Boundary::Bounce {
            margin: 10.,
            turn_factor: 1.,
        };
        b.boundaries(&bounce, &get_window_size(30, 30));

        assert_eq!(b.velocity, Vec2::from(expected));
        assert_eq!(b.position, Vec2::from(position));
    }

    #[test]
    fn update_location_moves_then_wraps() {
        let mut b = boid(0, (9., 5.), (2., -6.));
        b.update_location(&Boundary::Wrap, &get_window_size(10, 10));

        assert_eq!(b.position, Vec2::new(1., 9.));
    }
}
