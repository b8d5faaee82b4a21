use bevy::image::{ImageAddressMode, ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;

/// Ground texture awaiting its tiling sampler.
#[derive(Resource, Debug, Clone)]
pub struct GroundTexture {
    pub handle: Handle<Image>,
    pub configured: bool,
}

impl GroundTexture {
    pub fn new(handle: Handle<Image>) -> Self {
        Self {
            handle,
            configured: false,
        }
    }
}

/// Sampler for textures tiled across large surfaces.
pub fn repeating_sampler() -> ImageSampler {
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        mag_filter: ImageFilterMode::Linear,
        min_filter: ImageFilterMode::Linear,
        mipmap_filter: ImageFilterMode::Linear,
        anisotropy_clamp: 16,
        ..default()
    })
}

/// Switch the ground texture to repeat addressing once its image exists.
pub fn configure_ground_texture(
    mut ground: ResMut<GroundTexture>,
    mut images: ResMut<Assets<Image>>,
) {
    if ground.configured {
        return;
    }
    let Some(image) = images.get_mut(&ground.handle) else {
        return;
    };

    image.sampler = repeating_sampler();
    ground.configured = true;
    debug!("Ground texture configured for repeat sampling");
}
