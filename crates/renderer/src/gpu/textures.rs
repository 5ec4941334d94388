use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::flip_vertical_in_place;
use wgpu::util::{DeviceExt, TextureDataOrder};

use super::context::SurfaceColorSpace;

const PLACEHOLDER_TEXEL: [u8; 4] = [40, 40, 40, 255];

pub(crate) struct GalleryTexture {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub dimensions: (u32, u32),
}

/// Uploads every gallery image in order. Images that fail to decode are
/// replaced by a placeholder so slide indices stay stable.
pub(crate) fn load_gallery(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    paths: &[PathBuf],
    color_space: SurfaceColorSpace,
) -> Vec<GalleryTexture> {
    paths
        .iter()
        .enumerate()
        .map(
            |(index, path)| match load_image(device, queue, index, path, color_space) {
                Ok(texture) => {
                    tracing::debug!(
                        slide = index,
                        path = %path.display(),
                        width = texture.dimensions.0,
                        height = texture.dimensions.1,
                        "uploaded gallery texture"
                    );
                    texture
                }
                Err(error) => {
                    tracing::warn!(
                        slide = index,
                        path = %path.display(),
                        error = %error,
                        "failed to load gallery image; using placeholder"
                    );
                    create_placeholder(device, queue, index, color_space)
                }
            },
        )
        .collect()
}

fn load_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    index: usize,
    path: &Path,
    color_space: SurfaceColorSpace,
) -> Result<GalleryTexture> {
    let image = image::open(path)
        .with_context(|| format!("failed to open gallery image {}", path.display()))?;
    let mut rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let max_dimension = device.limits().max_texture_dimension_2d;
    if width > max_dimension || height > max_dimension {
        anyhow::bail!(
            "image is {width}x{height} but the GPU supports at most {max_dimension} per side"
        );
    }
    flip_vertical_in_place(&mut rgba);

    let texture = upload(
        device,
        queue,
        &format!("gallery texture #{index}"),
        (width, height),
        color_space,
        &rgba,
    );
    Ok(wrap(device, texture, (width, height)))
}

fn create_placeholder(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    index: usize,
    color_space: SurfaceColorSpace,
) -> GalleryTexture {
    let texture = upload(
        device,
        queue,
        &format!("placeholder gallery texture #{index}"),
        (1, 1),
        color_space,
        &PLACEHOLDER_TEXEL,
    );
    wrap(device, texture, (1, 1))
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    (width, height): (u32, u32),
    color_space: SurfaceColorSpace,
    data: &[u8],
) -> wgpu::Texture {
    device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_space.texture_format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        data,
    )
}

fn wrap(
    device: &wgpu::Device,
    texture: wgpu::Texture,
    dimensions: (u32, u32),
) -> GalleryTexture {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });
    GalleryTexture {
        _texture: texture,
        view,
        sampler,
        dimensions,
    }
}
