use wasm_bindgen::JsValue;
use web_sys::{
    WebGl2RenderingContext,
    WebGlTexture,
    WebGlFramebuffer,
};

/// A single RGBA32F color target with the framebuffer it is attached to.
pub struct TextureFramebuffer {
    texture: WebGlTexture,
    framebuffer: WebGlFramebuffer,
    width: u32,
    height: u32,
}

impl TextureFramebuffer {
    pub fn new(
        gl: &WebGl2RenderingContext,
        width: u32,
        height: u32,
    ) -> Result<TextureFramebuffer, JsValue> {
        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
        let texture = gl.create_texture().unwrap();
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, Some(&texture));

        gl.tex_parameteri(
            WebGl2RenderingContext::TEXTURE_2D,
            WebGl2RenderingContext::TEXTURE_MIN_FILTER,
            WebGl2RenderingContext::LINEAR as i32,
        );
        gl.tex_parameteri(
            WebGl2RenderingContext::TEXTURE_2D,
            WebGl2RenderingContext::TEXTURE_MAG_FILTER,
            WebGl2RenderingContext::LINEAR as i32,
        );
        gl.tex_parameteri(
            WebGl2RenderingContext::TEXTURE_2D,
            WebGl2RenderingContext::TEXTURE_WRAP_S,
            WebGl2RenderingContext::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameteri(
            WebGl2RenderingContext::TEXTURE_2D,
            WebGl2RenderingContext::TEXTURE_WRAP_T,
            WebGl2RenderingContext::CLAMP_TO_EDGE as i32,
        );

        let zeros = vec![0.0f32; (width * height * 4) as usize];
        let data = unsafe { js_sys::Float32Array::view(&zeros) };
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_array_buffer_view(
            WebGl2RenderingContext::TEXTURE_2D,
            0,
            WebGl2RenderingContext::RGBA32F as i32,
            width as i32,
            height as i32,
            0,
            WebGl2RenderingContext::RGBA,
            WebGl2RenderingContext::FLOAT,
            Some(&data),
        )?;

        let framebuffer = gl.create_framebuffer().unwrap();
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            WebGl2RenderingContext::FRAMEBUFFER,
            WebGl2RenderingContext::COLOR_ATTACHMENT0,
            WebGl2RenderingContext::TEXTURE_2D,
            Some(&texture),
            0,
        );

        Ok(TextureFramebuffer {
            texture,
            framebuffer,
            width,
            height,
        })
    }

    pub fn bind(
        &self,
        gl: &WebGl2RenderingContext,
        id: u32,
    ) -> Result<i32, JsValue> {
        if id >= 32 {
            return Err(JsValue::from_str("id >= 32"));
        }

        gl.active_texture(WebGl2RenderingContext::TEXTURE0 + id);
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, Some(&self.texture));

        Ok(id as i32)
    }

    pub fn delete(&self, gl: &WebGl2RenderingContext) {
        gl.delete_texture(Some(&self.texture));
        gl.delete_framebuffer(Some(&self.framebuffer));
    }

    pub fn buffer(&self) -> &WebGlFramebuffer {
        &self.framebuffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Two equally shaped slots whose read/write roles exchange every frame.
///
/// The roles are exchanged by toggling a single index instead of swapping
/// the slot values themselves, so the slots never move after creation.
pub struct PingPong<T> {
    slots: [T; 2],
    index: usize,
}

impl<T> PingPong<T> {
    pub fn new(front: T, back: T) -> PingPong<T> {
        PingPong {
            slots: [front, back],
            index: 0,
        }
    }

    /// The slot holding last frame's output.
    pub fn read(&self) -> &T {
        &self.slots[self.index]
    }

    /// The slot the current pass renders into.
    pub fn write(&self) -> &T {
        &self.slots[self.index ^ 1]
    }

    pub fn swap(&mut self) {
        self.index ^= 1;
    }

    pub fn slots(&self) -> &[T; 2] {
        &self.slots
    }
}
