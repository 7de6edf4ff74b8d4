use rasterra::prelude::*;
use rasterra::window::{WINDOW_HEIGHT, WINDOW_WIDTH};

/// A cube with radial per-vertex normals so directional lighting shades it.
fn lit_cube(color: Rgb) -> Mesh {
    let positions = vec![
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
    ];
    let normals = positions.iter().map(|p| p.normalize()).collect();
    let faces = vec![
        [0, 1, 2],
        [0, 2, 3],
        [4, 5, 6],
        [4, 6, 7],
        [1, 4, 7],
        [1, 7, 2],
        [5, 0, 3],
        [5, 3, 6],
        [3, 2, 7],
        [3, 7, 6],
        [5, 4, 1],
        [5, 1, 0],
    ];
    let colors = vec![color; 8];
    Mesh::new(positions, Some(normals), faces, colors).expect("built-in cube mesh is valid")
}

fn main() -> Result<(), String> {
    let mut window = Window::new("Rasterra", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut engine = Engine::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    // Optional OBJ model as the centerpiece; falls back to the built-in cube.
    let centerpiece_mesh = match std::env::args().nth(1) {
        Some(path) => engine.scene_mut().add_mesh(
            Mesh::from_obj(&path, Rgb::new(220, 180, 60)).map_err(|e| e.to_string())?,
        ),
        None => engine
            .scene_mut()
            .add_mesh(lit_cube(Rgb::new(220, 180, 60))),
    };
    let ring_mesh = engine.scene_mut().add_mesh(lit_cube(Rgb::new(90, 140, 230)));

    let sun = engine
        .scene_mut()
        .add_light(DirectionalLight::new(Vec4::direction(0.5, 1.0, 0.5)));

    let centerpiece = engine.scene_mut().add_object(ObjectDef {
        mesh: centerpiece_mesh,
        light: sun,
        scale: 1.5,
        position: Vec3::new(0.0, 0.0, -12.0),
        rotation_x: 0.0,
        rotation_y: 0.0,
        lit: true,
        active: true,
    });

    let ring_ids: Vec<ObjectId> = (0..6)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::FRAC_PI_3;
            engine.scene_mut().add_object(ObjectDef {
                mesh: ring_mesh,
                light: sun,
                scale: 0.6,
                position: Vec3::new(angle.cos() * 6.0, 0.0, -12.0 + angle.sin() * 6.0),
                rotation_x: 0.0,
                rotation_y: angle,
                lit: true,
                active: true,
            })
        })
        .collect();

    engine.camera_mut().set_position(Vec3::new(0.0, 3.0, 0.0));
    engine.camera_mut().set_rotation(Vec3::new(-0.25, 0.0, 0.0));

    let mut limiter = FrameLimiter::new(&window);
    let mut angle = 0.0f32;
    let mut screenshot_index = 0u32;

    loop {
        let mut take_screenshot = false;
        match window.poll_events() {
            WindowEvent::Quit => break,
            WindowEvent::Screenshot => take_screenshot = true,
            WindowEvent::None => {}
        }

        let delta = limiter.wait_and_get_delta(&window) as f32 / 1000.0;
        angle += delta * std::f32::consts::FRAC_PI_4;

        engine
            .scene_mut()
            .object_mut(centerpiece)
            .set_rotation_y(angle);
        for (i, &id) in ring_ids.iter().enumerate() {
            engine
                .scene_mut()
                .object_mut(id)
                .set_rotation_y(angle + i as f32 * std::f32::consts::FRAC_PI_3);
        }
        // The sun circles the scene; every lit object picks up the change.
        *engine.scene_mut().light_mut(sun) =
            DirectionalLight::new(Vec4::direction(angle.cos(), 1.0, angle.sin()));

        let frame = engine.render_frame().map_err(|e| e.to_string())?;
        if take_screenshot {
            let path = format!("frame_{screenshot_index:03}.png");
            frame.save_png(&path).map_err(|e| e.to_string())?;
            println!("saved {path}");
            screenshot_index += 1;
        }
        window.present(frame)?;
    }

    Ok(())
}
