use dotmatrix::{SCREEN_HEIGHT, SCREEN_WIDTH};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

/// Streaming texture matching the core's ARGB1555 frame encoding.
pub fn create_screen_texture(
    texture_creator: &TextureCreator<WindowContext>,
) -> Result<Texture<'_>, String> {
    texture_creator
        .create_texture_streaming(
            PixelFormatEnum::ARGB1555,
            SCREEN_WIDTH as u32,
            SCREEN_HEIGHT as u32,
        )
        .map_err(|e| e.to_string())
}

/// Uploads the frame and presents it scaled to the window.
pub fn draw_frame(
    canvas: &mut Canvas<Window>,
    texture: &mut Texture<'_>,
    frame: &[u16],
) -> Result<(), String> {
    texture
        .with_lock(None, |pixels, pitch| {
            for (y, row) in frame.chunks_exact(SCREEN_WIDTH).enumerate() {
                let line = &mut pixels[y * pitch..y * pitch + SCREEN_WIDTH * 2];
                for (x, &px) in row.iter().enumerate() {
                    line[x * 2..x * 2 + 2].copy_from_slice(&px.to_le_bytes());
                }
            }
        })
        .map_err(|e| e.to_string())?;
    canvas.clear();
    canvas.copy(texture, None, None)?;
    canvas.present();
    Ok(())
}
