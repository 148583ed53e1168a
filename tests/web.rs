//! Browser smoke tests, run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use water_surface::Renderer;

wasm_bindgen_test_configure!(run_in_browser);

fn insert_canvas(id: &str, width: u32, height: u32) {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();

    canvas.set_id(id);
    canvas.set_width(width);
    canvas.set_height(height);
    document.body().unwrap().append_child(&canvas).unwrap();
}

#[wasm_bindgen_test]
fn renders_frames_and_resizes() {
    insert_canvas("surface-test", 320, 240);

    let mut renderer = Renderer::create("surface-test").unwrap();
    assert_eq!((renderer.width(), renderer.height()), (320, 240));

    renderer.update().unwrap();
    renderer.pointer_move(160.0, 120.0);
    renderer.update().unwrap();
    renderer.pointer_out();
    renderer.update().unwrap();

    renderer.resize(400, 300).unwrap();
    assert_eq!((renderer.width(), renderer.height()), (400, 300));

    renderer.update().unwrap();
}
