//! Procedural smoke texture
//!
//! The die body samples an RGBA image that is repainted every frame from
//! layered sine noise, a little random sparkle, an ordered dither and a soft
//! radial swirl drifting across it. Purely cosmetic.

use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dice3d::types::RollerSettings;

/// Time added per frame.
pub const TIME_STEP: f32 = 0.02;
/// Pattern scales are tuned for this side length and rescaled for others.
const REFERENCE_SIZE: f32 = 512.0;

/// Handle and animation state of the smoke texture.
#[derive(Resource)]
pub struct SmokeTexture {
    pub image: Handle<Image>,
    pub size: u32,
    pub tint: [u8; 3],
    pub time: f32,
    rng: StdRng,
}

impl SmokeTexture {
    pub fn new(image: Handle<Image>, size: u32, tint: [u8; 3]) -> Self {
        Self {
            image,
            size,
            tint,
            time: 0.0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Blank tiling RGBA image to paint into.
    pub fn create_image(size: u32) -> Image {
        let mut image = Image::new_fill(
            Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            &[0, 0, 0, 255],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        );
        image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
            address_mode_u: ImageAddressMode::Repeat,
            address_mode_v: ImageAddressMode::Repeat,
            ..default()
        });
        image
    }
}

/// Smoke brightness at a pixel, 0.0..=1.0. `jitter` is high-frequency noise
/// in -0.5..0.5.
pub fn smoke_intensity(x: u32, y: u32, size: u32, time: f32, jitter: f32) -> f32 {
    let scale = REFERENCE_SIZE / size.max(1) as f32;
    let px = x as f32 * scale;
    let py = y as f32 * scale;
    let half = REFERENCE_SIZE / 2.0;

    let ring = ((px - half + time.sin() * 100.0).powi(2) + (py - half + time.cos() * 100.0).powi(2))
        .sqrt();
    let noise = ((px + time * 2.0) / 20.0).sin() * 0.3
        + ((py - time * 1.5) / 25.0).sin() * 0.3
        + ((px + py + time * 3.0) / 40.0).sin() * 0.4
        + jitter * 0.3
        + (ring / 50.0).sin() * 0.4;

    // 4x4 ordered dither
    let dither = ((x % 4) as f32 / 4.0 + (y % 4) as f32 / 4.0) * 0.1;
    ((noise + dither) * 0.7 + 0.3).clamp(0.0, 1.0)
}

/// Swirl gradient at normalized distance `t`: (tinted, alpha). `tinted`
/// is 1.0 for the smoke color and 0.0 for black.
fn swirl_stop(t: f32) -> (f32, f32) {
    const STOPS: [(f32, f32, f32); 4] = [(0.0, 1.0, 0.4), (0.3, 0.0, 0.2), (0.7, 1.0, 0.2), (1.0, 0.0, 0.3)];
    let t = t.clamp(0.0, 1.0);
    for pair in STOPS.windows(2) {
        let (t0, c0, a0) = pair[0];
        let (t1, c1, a1) = pair[1];
        if t <= t1 {
            let k = (t - t0) / (t1 - t0);
            return (c0 + (c1 - c0) * k, a0 + (a1 - a0) * k);
        }
    }
    (0.0, 0.3)
}

fn overlay(base: f32, blend: f32) -> f32 {
    if base < 0.5 {
        2.0 * base * blend
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - blend)
    }
}

/// Repaint the RGBA8 pixel buffer for the given time.
pub fn paint_smoke(data: &mut [u8], size: u32, tint: [u8; 3], time: f32, rng: &mut impl Rng) {
    let scale = size as f32 / REFERENCE_SIZE;
    let focus = Vec2::new(
        REFERENCE_SIZE / 2.0 + (time * 0.5).sin() * 150.0,
        REFERENCE_SIZE / 2.0 + (time * 0.7).cos() * 150.0,
    ) * scale;
    let reach = size as f32 * 0.9;
    let tint_f = tint.map(|c| c as f32 / 255.0);

    for (i, pixel) in data.chunks_exact_mut(4).enumerate() {
        let x = i as u32 % size;
        let y = i as u32 / size;
        let intensity = smoke_intensity(x, y, size, time, rng.gen::<f32>() - 0.5);
        let sparkle = rng.gen::<f32>() * 20.0 / 255.0;

        let t = Vec2::new(x as f32, y as f32).distance(focus) / reach;
        let (tinted, alpha) = swirl_stop(t);

        for c in 0..3 {
            let mut base = tint_f[c] * intensity;
            if c == 1 {
                base += sparkle;
            }
            let base = base.clamp(0.0, 1.0);
            let blended = overlay(base, tint_f[c] * tinted);
            pixel[c] = ((base + (blended - base) * alpha) * 255.0).round() as u8;
        }
        pixel[3] = 255;
    }
}

/// Advance the smoke animation and repaint the image.
pub fn update_smoke_texture(mut smoke: ResMut<SmokeTexture>, mut images: ResMut<Assets<Image>>) {
    smoke.time += TIME_STEP;
    let SmokeTexture {
        image,
        size,
        tint,
        time,
        rng,
    } = &mut *smoke;

    let Some(image) = images.get_mut(&*image) else {
        return;
    };
    let Some(data) = image.data.as_mut() else {
        return;
    };
    paint_smoke(data, *size, *tint, *time, rng);
}

/// Build the smoke texture resource from the settings and register its image.
pub fn init_smoke_texture(settings: &RollerSettings, images: &mut Assets<Image>) -> SmokeTexture {
    let size = settings.texture_size();
    let handle = images.add(SmokeTexture::create_image(size));
    SmokeTexture::new(handle, size, settings.smoke_color.to_rgb8())
}
