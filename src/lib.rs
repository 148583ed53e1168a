//! An interactive water surface effect that is compiled using `wasm-pack` and runs in the browser
//!
//! Two floating-point render targets hold the simulation state (slope,
//! height and velocity per texel). Every frame a physics pass advances the
//! previous state into the current target and a lighting pass shades the
//! result onto the canvas. The host page drives the [renderer](Renderer)
//! from `requestAnimationFrame` and forwards pointer and touch events.

pub mod kernel;
pub mod input;
mod shaders;
mod textures;
mod shader_program;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{ HtmlCanvasElement, WebGl2RenderingContext };
use crate::input::{ PointerPair, PointerTracker };
use crate::shader_program::ShaderProgram;
use crate::textures::{ PingPong, TextureFramebuffer };

#[wasm_bindgen]
/// Renderer for the water surface effect
pub struct Renderer {
    gl: WebGl2RenderingContext,
    canvas: HtmlCanvasElement,
    seed_program: ShaderProgram,
    physics_program: ShaderProgram,
    lighting_program: ShaderProgram,
    state: PingPong<TextureFramebuffer>,
    tracker: PointerTracker,
    pointers: PointerPair,
}

#[wasm_bindgen]
impl Renderer {
    /// Create a new renderer
    ///
    /// There should really only ever exist one renderer.
    ///
    /// # Arguments
    /// * `canvas_id` - id of the canvas element
    ///
    /// # Returns
    /// The renderer object, or an error if the WebGL 2 rendering context
    /// cannot be acquired or a shader fails to compile.
    ///
    /// # Panics
    /// May panic if no html elements can be found.
    pub fn create(canvas_id: &str) -> Result<Renderer, JsValue> {
        console_error_panic_hook::set_once();
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas = document.get_element_by_id(canvas_id).unwrap();
        let canvas = canvas.dyn_into::<HtmlCanvasElement>().unwrap();

        let context_options = js_sys::Object::new();
        js_sys::Reflect::set(&context_options, &"antialias".into(), &JsValue::FALSE)?;
        js_sys::Reflect::set(&context_options, &"alpha".into(), &JsValue::FALSE)?;
        js_sys::Reflect::set(&context_options, &"depth".into(), &JsValue::FALSE)?;
        js_sys::Reflect::set(&context_options, &"stencil".into(), &JsValue::FALSE)?;

        let gl = match canvas.get_context_with_context_options("webgl2", &context_options) {
            Ok(Some(gl)) => gl.dyn_into::<WebGl2RenderingContext>().unwrap(),
            _ => return Err(JsValue::from_str("WebGL 2 seems to not be enabled in the browser")),
        };

        gl.get_extension("OES_texture_float_linear")?;
        gl.get_extension("EXT_color_buffer_float")?;
        gl.disable(WebGl2RenderingContext::BLEND);

        let seed_program = ShaderProgram::new(
            &gl,
            shaders::SEED_SHADER_SOURCE,
            shaders::VERTEX_SHADER_SOURCE,
        )?;
        let physics_program = ShaderProgram::new(
            &gl,
            shaders::PHYSICS_SHADER_SOURCE,
            shaders::VERTEX_SHADER_SOURCE,
        )?;
        let lighting_program = ShaderProgram::new(
            &gl,
            shaders::LIGHTING_SHADER_SOURCE,
            shaders::VERTEX_SHADER_SOURCE,
        )?;

        let width = canvas.width().max(1);
        let height = canvas.height().max(1);
        let state = PingPong::new(
            TextureFramebuffer::new(&gl, width, height)?,
            TextureFramebuffer::new(&gl, width, height)?,
        );

        Renderer::init_quad_buffers(&gl)?;

        let mut renderer = Renderer {
            gl,
            canvas,
            seed_program,
            physics_program,
            lighting_program,
            state,
            tracker: PointerTracker::default(),
            pointers: PointerPair::default(),
        };
        renderer.seed_state();

        Ok(renderer)
    }

    /// Update the renderer
    ///
    /// Runs one frame: samples the pointer tracker, advances the simulation
    /// state by one physics pass and shades the result onto the canvas.
    ///
    /// # Returns
    /// May return an error if something in the WebGL pipeline were to break.
    pub fn update(&mut self) -> Result<(), JsValue> {
        let gl = &self.gl;

        let (prev_pointer, pointer) = self.pointers.advance(self.tracker.sample());

        let width = self.state.read().width() as f32;
        let height = self.state.read().height() as f32;

        // PHYSICS
        self.physics_program.bind(gl);

        gl.uniform2f(
            self.physics_program.uniforms.get(shaders::U_RESOLUTION),
            width,
            height,
        );
        gl.uniform3f(
            self.physics_program.uniforms.get(shaders::U_POINTER),
            pointer.x,
            pointer.y,
            pointer.flag(),
        );
        gl.uniform3f(
            self.physics_program.uniforms.get(shaders::U_PREV_POINTER),
            prev_pointer.x,
            prev_pointer.y,
            prev_pointer.flag(),
        );
        gl.uniform1i(
            self.physics_program.uniforms.get(shaders::U_STATE),
            self.state.read().bind(gl, 0)?,
        );

        Renderer::blit(gl, Some(self.state.write()), None);
        self.state.swap();

        // LIGHTING
        // DRAW TO CANVAS
        self.lighting_program.bind(gl);

        gl.uniform1i(
            self.lighting_program.uniforms.get(shaders::U_STATE),
            self.state.read().bind(gl, 0)?,
        );

        Renderer::blit(gl, None, Some(true));

        Ok(())
    }

    /// Resize the renderer
    ///
    /// Recreates both state targets at the new size and re-seeds them, so
    /// the next frame never reads a stale or partially sized target.
    ///
    /// # Arguments
    /// * `width` - new canvas width in pixels
    /// * `height` - new canvas height in pixels
    ///
    /// # Returns
    /// May return an error if something in the WebGL pipeline were to break.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        let width = width.max(1);
        let height = height.max(1);

        self.canvas.set_width(width);
        self.canvas.set_height(height);

        if width == self.state.read().width() && height == self.state.read().height() {
            return Ok(());
        }

        let front = TextureFramebuffer::new(&self.gl, width, height)?;
        let back = TextureFramebuffer::new(&self.gl, width, height)?;

        for slot in self.state.slots() {
            slot.delete(&self.gl);
        }
        self.state = PingPong::new(front, back);
        self.seed_state();

        Ok(())
    }

    /// Report a pointer or touch position in canvas pixel coordinates
    ///
    /// The position is normalized against the canvas size and the y-axis is
    /// flipped to texture orientation. The sample is picked up by the next
    /// [update](Renderer::update) call; only the last report before a frame
    /// matters.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let width = self.canvas.width().max(1) as f32;
        let height = self.canvas.height().max(1) as f32;
        self.tracker.set(x / width, 1.0 - y / height);
    }

    /// Report that the pointer left the surface or the touch ended
    pub fn pointer_out(&mut self) {
        self.tracker.clear();
    }

    /// Current width of the simulation targets in pixels
    pub fn width(&self) -> u32 {
        self.state.read().width()
    }

    /// Current height of the simulation targets in pixels
    pub fn height(&self) -> u32 {
        self.state.read().height()
    }
}

impl Renderer {
    /// Write the rest state into both targets so the first physics pass
    /// never reads undefined texels.
    fn seed_state(&mut self) {
        let gl = &self.gl;
        self.seed_program.bind(gl);

        for _ in 0..2 {
            Renderer::blit(gl, Some(self.state.write()), None);
            self.state.swap();
        }
    }

    fn init_quad_buffers(gl: &WebGl2RenderingContext) -> Result<(), JsValue> {
        let vertex_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));

        let vertices = [
            -1.0, -1.0, 0.0, 0.0,
             1.0, -1.0, 1.0, 0.0,
            -1.0,  1.0, 0.0, 1.0,
             1.0,  1.0, 1.0, 1.0,
        ];
        let vertices = unsafe { js_sys::Float32Array::view(&vertices) };
        gl.buffer_data_with_array_buffer_view(
            WebGl2RenderingContext::ARRAY_BUFFER,
            &vertices,
            WebGl2RenderingContext::STATIC_DRAW,
        );

        gl.vertex_attrib_pointer_with_i32(
            0,
            2,
            WebGl2RenderingContext::FLOAT,
            false,
            16,
            0,
        );
        gl.vertex_attrib_pointer_with_i32(
            1,
            2,
            WebGl2RenderingContext::FLOAT,
            false,
            16,
            8,
        );

        gl.enable_vertex_attrib_array(0);
        gl.enable_vertex_attrib_array(1);

        Ok(())
    }

    fn blit(
        gl: &WebGl2RenderingContext,
        target: Option<&TextureFramebuffer>,
        clear: Option<bool>,
    ) {
        match target {
            Some(tfb) => {
                gl.viewport(
                    0,
                    0,
                    tfb.width() as i32,
                    tfb.height() as i32,
                );
                gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, Some(tfb.buffer()));
            }
            None => {
                gl.viewport(
                    0,
                    0,
                    gl.drawing_buffer_width(),
                    gl.drawing_buffer_height(),
                );
                gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, None);
            }
        }

        if clear.unwrap_or(false) {
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(WebGl2RenderingContext::COLOR_BUFFER_BIT);
        }

        gl.draw_arrays(
            WebGl2RenderingContext::TRIANGLE_STRIP,
            0,
            4,
        );
    }
}
