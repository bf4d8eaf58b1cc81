/// WebGL2 renderer: stars as point sprites, skill shapes as line lists
use backdrop_core::{Camera, Scene, SceneRenderer, ShapeKind, SurfaceSize, Transform, Wireframe};
use js_sys::{Float32Array, Object, Reflect};
use nalgebra::Matrix4;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

const VERTEX_SHADER: &str = r#"#version 300 es
in vec3 a_position;
uniform mat4 u_model_view;
uniform mat4 u_projection;
uniform float u_point_size;
uniform float u_point_scale;
out float v_distance;

void main() {
    vec4 view_position = u_model_view * vec4(a_position, 1.0);
    v_distance = -view_position.z;
    gl_Position = u_projection * view_position;
    gl_PointSize = max(u_point_size * u_point_scale / v_distance, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in float v_distance;
uniform vec3 u_color;
uniform float u_opacity;
uniform vec3 u_fog_color;
uniform float u_fog_near;
uniform float u_fog_far;
out vec4 out_color;

void main() {
    float fog = clamp((v_distance - u_fog_near) / (u_fog_far - u_fog_near), 0.0, 1.0);
    out_color = vec4(mix(u_color, u_fog_color, fog), u_opacity);
}
"#;

/// Interleave-free xyz positions for every star
pub fn star_vertices(scene: &Scene) -> Vec<f32> {
    scene
        .particles
        .positions
        .iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .collect()
}

/// Expand indexed edges into a `LINES` vertex list
pub fn line_vertices(wireframe: &Wireframe) -> Vec<f32> {
    wireframe
        .segments()
        .flat_map(|(a, b)| [a.x, a.y, a.z, b.x, b.y, b.z])
        .collect()
}

struct Uniforms {
    model_view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    point_size: Option<WebGlUniformLocation>,
    point_scale: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    fog_color: Option<WebGlUniformLocation>,
    fog_near: Option<WebGlUniformLocation>,
    fog_far: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(program, name);
        Self {
            model_view: at("u_model_view"),
            projection: at("u_projection"),
            point_size: at("u_point_size"),
            point_scale: at("u_point_scale"),
            color: at("u_color"),
            opacity: at("u_opacity"),
            fog_color: at("u_fog_color"),
            fog_near: at("u_fog_near"),
            fog_far: at("u_fog_far"),
        }
    }
}

/// Vertex array plus its backing buffer
struct Geometry {
    vao: WebGlVertexArrayObject,
    _buffer: WebGlBuffer,
    vertex_count: i32,
}

impl Geometry {
    fn upload(gl: &GL, vertices: &[f32], position_attrib: u32) -> Result<Self, JsValue> {
        let vao = gl
            .create_vertex_array()
            .ok_or("could not create vertex array")?;
        let buffer = gl.create_buffer().ok_or("could not create buffer")?;

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_array_buffer_view(
            GL::ARRAY_BUFFER,
            &Float32Array::from(vertices),
            GL::STATIC_DRAW,
        );
        gl.enable_vertex_attrib_array(position_attrib);
        gl.vertex_attrib_pointer_with_i32(position_attrib, 3, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            _buffer: buffer,
            vertex_count: (vertices.len() / 3) as i32,
        })
    }
}

pub struct WebGlRenderer {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    uniforms: Uniforms,
    stars: Geometry,
    shapes: Vec<Geometry>,
}

impl WebGlRenderer {
    /// Acquire a WebGL2 context on `canvas` and upload the static geometry
    pub fn new(canvas: HtmlCanvasElement, scene: &Scene, antialias: bool) -> Result<Self, JsValue> {
        let options = Object::new();
        Reflect::set(&options, &"antialias".into(), &antialias.into())?;

        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &options)?
            .ok_or("WebGL2 not supported")?
            .dyn_into()?;

        let vertex = compile_shader(&gl, VERTEX_SHADER, GL::VERTEX_SHADER)?;
        let fragment = compile_shader(&gl, FRAGMENT_SHADER, GL::FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vertex, &fragment)?;
        let uniforms = Uniforms::locate(&gl, &program);

        let position = gl.get_attrib_location(&program, "a_position");
        if position < 0 {
            return Err("a_position attribute missing".into());
        }
        let position = position as u32;

        let stars = Geometry::upload(&gl, &star_vertices(scene), position)?;
        let shapes = ShapeKind::ALL
            .iter()
            .map(|&kind| Geometry::upload(&gl, &line_vertices(scene.wireframe(kind)), position))
            .collect::<Result<Vec<_>, _>>()?;

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        Ok(Self {
            canvas,
            gl,
            program,
            uniforms,
            stars,
            shapes,
        })
    }

    /// Resize the drawing buffer only when the size actually changed
    fn fit(&self, size: SurfaceSize) {
        if self.canvas.width() != size.width || self.canvas.height() != size.height {
            self.canvas.set_width(size.width);
            self.canvas.set_height(size.height);
        }
        self.gl.viewport(0, 0, size.width as i32, size.height as i32);
    }

    fn draw(&self, geometry: &Geometry, mode: u32, model_view: &Matrix4<f32>) {
        self.gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.model_view.as_ref(),
            false,
            model_view.as_slice(),
        );
        self.gl.bind_vertex_array(Some(&geometry.vao));
        self.gl.draw_arrays(mode, 0, geometry.vertex_count);
    }
}

impl SceneRenderer for WebGlRenderer {
    type Error = JsValue;

    fn render(&mut self, scene: &Scene, camera: &Camera, size: SurfaceSize) -> Result<(), JsValue> {
        self.fit(size);

        let gl = &self.gl;
        let u = &self.uniforms;
        let bg = scene.background;
        gl.clear_color(bg.r, bg.g, bg.b, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.use_program(Some(&self.program));

        let view = camera.view_matrix();
        gl.uniform_matrix4fv_with_f32_array(
            u.projection.as_ref(),
            false,
            camera.projection_matrix().as_slice(),
        );
        gl.uniform3fv_with_f32_array(u.fog_color.as_ref(), &scene.fog.color.to_array());
        gl.uniform1f(u.fog_near.as_ref(), scene.fog.near);
        gl.uniform1f(u.fog_far.as_ref(), scene.fog.far);
        gl.uniform3fv_with_f32_array(u.color.as_ref(), &scene.accent.to_array());

        // Stars
        gl.uniform1f(u.opacity.as_ref(), scene.particles.opacity);
        gl.uniform1f(u.point_size.as_ref(), scene.particles.size);
        gl.uniform1f(u.point_scale.as_ref(), size.height as f32 / 2.0);
        let star_model = Transform::rotation_matrix(&scene.particles.rotation);
        self.draw(&self.stars, GL::POINTS, &(view * star_model));

        // Skill shapes
        let group = &scene.skills;
        if group.visible {
            gl.uniform1f(u.opacity.as_ref(), group.opacity);
            let group_view = view * group.pose.matrix();
            for shape in &group.shapes {
                let model_view = group_view * shape.pose.matrix();
                self.draw(&self.shapes[shape.kind.index()], GL::LINES, &model_view);
            }
        }

        gl.bind_vertex_array(None);
        Ok(())
    }
}

fn compile_shader(gl: &GL, src: &str, shader_type: u32) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or("could not create shader")?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if !gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return Err(JsValue::from(gl.get_shader_info_log(&shader).unwrap_or_default()));
    }
    Ok(shader)
}

fn link_program(gl: &GL, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram, JsValue> {
    let program = gl.create_program().ok_or("could not create program")?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);
    if !gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return Err(JsValue::from(gl.get_program_info_log(&program).unwrap_or_default()));
    }
    Ok(program)
}
