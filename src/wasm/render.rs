use glam::{Mat4, Vec3};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlContextAttributes, WebGlProgram,
    WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::VizError;
use crate::geometry::Color;
use crate::render::SceneRenderer;
use crate::scene::{Group, Light, Scene};

const LINE_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
uniform mat4 u_view_proj;
uniform mat4 u_model;
void main() {
    gl_Position = u_view_proj * u_model * vec4(a_position, 1.0);
}
"#;

const LINE_FS: &str = r#"#version 300 es
precision mediump float;
uniform vec3 u_color;
uniform float u_opacity;
out vec4 frag;
void main() {
    frag = vec4(u_color, u_opacity);
}
"#;

const CORE_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
uniform mat4 u_view_proj;
uniform mat4 u_model;
out vec3 v_world;
out vec3 v_normal;
void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world = world.xyz;
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_view_proj * world;
}
"#;

// Phong with one ambient term and two point lights.
const CORE_FS: &str = r#"#version 300 es
precision mediump float;
uniform vec3 u_color;
uniform float u_opacity;
uniform vec3 u_ambient;
uniform vec3 u_light_pos[2];
uniform vec3 u_light_color[2];
uniform vec3 u_eye;
in vec3 v_world;
in vec3 v_normal;
out vec4 frag;
void main() {
    vec3 n = normalize(v_normal);
    vec3 v = normalize(u_eye - v_world);
    vec3 diffuse = vec3(0.0);
    vec3 specular = vec3(0.0);
    for (int i = 0; i < 2; i++) {
        vec3 l = normalize(u_light_pos[i] - v_world);
        diffuse += max(dot(n, l), 0.0) * u_light_color[i];
        vec3 h = normalize(l + v);
        specular += pow(max(dot(n, h), 0.0), 30.0) * u_light_color[i] * 0.0667;
    }
    frag = vec4(u_color * (u_ambient + diffuse) + specular, u_opacity);
}
"#;

const MAX_POINT_LIGHTS: usize = 2;

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, VizError> {
    let shader = gl.create_shader(kind).ok_or(VizError::GpuAlloc("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(VizError::ShaderCompile(gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}

fn link(gl: &GL, vs: &str, fs: &str) -> Result<WebGlProgram, VizError> {
    let program = gl.create_program().ok_or(VizError::GpuAlloc("program"))?;
    gl.attach_shader(&program, &compile(gl, GL::VERTEX_SHADER, vs)?);
    gl.attach_shader(&program, &compile(gl, GL::FRAGMENT_SHADER, fs)?);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(VizError::ProgramLink(gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn upload_vertices(gl: &GL, location: u32, data: &[f32]) -> Result<WebGlBuffer, VizError> {
    let buffer = gl.create_buffer().ok_or(VizError::GpuAlloc("buffer"))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &js_sys::Float32Array::from(data), GL::STATIC_DRAW);
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, 3, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

fn flatten(points: impl IntoIterator<Item = Vec3>) -> Vec<f32> {
    points.into_iter().flat_map(|p| p.to_array()).collect()
}

struct Uniforms {
    view_proj: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        Self {
            view_proj: gl.get_uniform_location(program, "u_view_proj"),
            model: gl.get_uniform_location(program, "u_model"),
            color: gl.get_uniform_location(program, "u_color"),
            opacity: gl.get_uniform_location(program, "u_opacity"),
        }
    }

    fn set_transform(&self, gl: &GL, view_proj: &Mat4, model: &Mat4) {
        gl.uniform_matrix4fv_with_f32_array(self.view_proj.as_ref(), false, &view_proj.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(self.model.as_ref(), false, &model.to_cols_array());
    }

    fn set_material(&self, gl: &GL, color: Color, opacity: f32) {
        gl.uniform3f(self.color.as_ref(), color.r, color.g, color.b);
        gl.uniform1f(self.opacity.as_ref(), opacity);
    }
}

struct FiberRange {
    first: i32,
    count: i32,
    color: Color,
    opacity: f32,
}

struct LinePass {
    program: WebGlProgram,
    uniforms: Uniforms,
    vao: Option<WebGlVertexArrayObject>,
    ranges: Vec<FiberRange>,
}

struct CorePass {
    program: WebGlProgram,
    uniforms: Uniforms,
    ambient: Option<WebGlUniformLocation>,
    light_pos: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
    eye: Option<WebGlUniformLocation>,
    vao: Option<WebGlVertexArrayObject>,
    index_count: i32,
    color: Color,
    opacity: f32,
}

/// Draws the scene into a WebGL2 canvas. Geometry is uploaded once by
/// [`WebGlRenderer::upload`]; each frame only sends matrices and materials.
pub struct WebGlRenderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    pixel_ratio: f64,
    width: u32,
    height: u32,
    lines: LinePass,
    core: CorePass,
}

impl WebGlRenderer {
    pub fn new(canvas: HtmlCanvasElement, pixel_ratio: f64) -> Result<Self, VizError> {
        let attrs = WebGlContextAttributes::new();
        attrs.set_antialias(true);
        attrs.set_alpha(true);
        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &attrs)?
            .ok_or(VizError::WebGlUnsupported)?
            .dyn_into()
            .map_err(|_| VizError::WebGlUnsupported)?;

        let line_program = link(&gl, LINE_VS, LINE_FS)?;
        let core_program = link(&gl, CORE_VS, CORE_FS)?;

        let lines = LinePass {
            uniforms: Uniforms::locate(&gl, &line_program),
            program: line_program,
            vao: None,
            ranges: Vec::new(),
        };
        let core = CorePass {
            uniforms: Uniforms::locate(&gl, &core_program),
            ambient: gl.get_uniform_location(&core_program, "u_ambient"),
            light_pos: gl.get_uniform_location(&core_program, "u_light_pos"),
            light_color: gl.get_uniform_location(&core_program, "u_light_color"),
            eye: gl.get_uniform_location(&core_program, "u_eye"),
            program: core_program,
            vao: None,
            index_count: 0,
            color: Color::from_hex(0),
            opacity: 0.0,
        };

        Ok(Self {
            gl,
            canvas,
            pixel_ratio: pixel_ratio.max(1.0),
            width: 0,
            height: 0,
            lines,
            core,
        })
    }

    /// Sends the group's fibers and core to the GPU.
    pub fn upload(&mut self, group: &Group) -> Result<(), VizError> {
        let gl = &self.gl;

        let vao = gl.create_vertex_array().ok_or(VizError::GpuAlloc("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let mut ranges = Vec::new();
        let mut first = 0;
        for fiber in group.fibers() {
            let count = fiber.points.len() as i32;
            ranges.push(FiberRange {
                first,
                count,
                color: fiber.color,
                opacity: fiber.opacity,
            });
            first += count;
        }
        upload_vertices(gl, 0, &flatten(group.fibers().flat_map(|f| f.points.iter().copied())))?;
        self.lines.vao = Some(vao);
        self.lines.ranges = ranges;

        if let Some(core) = group.cores().next() {
            let vao = gl.create_vertex_array().ok_or(VizError::GpuAlloc("vertex array"))?;
            gl.bind_vertex_array(Some(&vao));
            upload_vertices(gl, 0, &flatten(core.positions.iter().copied()))?;
            upload_vertices(gl, 1, &flatten(core.normals()))?;

            let indices: Vec<u32> = core.edges.iter().flatten().copied().collect();
            let index_buffer = gl.create_buffer().ok_or(VizError::GpuAlloc("buffer"))?;
            gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
            gl.buffer_data_with_array_buffer_view(
                GL::ELEMENT_ARRAY_BUFFER,
                &js_sys::Uint32Array::from(indices.as_slice()),
                GL::STATIC_DRAW,
            );

            self.core.vao = Some(vao);
            self.core.index_count = indices.len() as i32;
            self.core.color = core.color;
            self.core.opacity = core.opacity;
        }
        gl.bind_vertex_array(None);

        debug!(
            fibers = self.lines.ranges.len(),
            core_edges = self.core.index_count / 2,
            "geometry uploaded"
        );
        Ok(())
    }

    fn set_lights(&self, scene: &Scene) {
        let gl = &self.gl;
        let mut ambient = [0.0f32; 3];
        let mut positions = [0.0f32; 3 * MAX_POINT_LIGHTS];
        let mut colors = [0.0f32; 3 * MAX_POINT_LIGHTS];
        let mut points = 0;
        for light in &scene.lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    for (acc, c) in ambient.iter_mut().zip(color.to_array()) {
                        *acc += c * intensity;
                    }
                }
                Light::Point {
                    color,
                    intensity,
                    position,
                } if points < MAX_POINT_LIGHTS => {
                    positions[points * 3..points * 3 + 3].copy_from_slice(&position.to_array());
                    let scaled = color.to_array().map(|c| c * intensity);
                    colors[points * 3..points * 3 + 3].copy_from_slice(&scaled);
                    points += 1;
                }
                Light::Point { .. } => {}
            }
        }
        gl.uniform3fv_with_f32_array(self.core.ambient.as_ref(), &ambient);
        gl.uniform3fv_with_f32_array(self.core.light_pos.as_ref(), &positions);
        gl.uniform3fv_with_f32_array(self.core.light_color.as_ref(), &colors);
        gl.uniform3fv_with_f32_array(self.core.eye.as_ref(), &scene.camera.position.to_array());
    }
}

impl SceneRenderer for WebGlRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.canvas.set_width((f64::from(width) * self.pixel_ratio).round() as u32);
        self.canvas.set_height((f64::from(height) * self.pixel_ratio).round() as u32);
        let style = self.canvas.style();
        for (name, value) in [("width", width), ("height", height)] {
            if let Err(err) = style.set_property(name, &format!("{value}px")) {
                warn!(name, ?err, "canvas style update failed");
            }
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn render(&mut self, scene: &Scene) -> Result<(), VizError> {
        let gl = &self.gl;
        gl.viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        // Everything in the scene is translucent: blend, test depth, never write it.
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.enable(GL::DEPTH_TEST);
        gl.depth_mask(false);

        let view_proj = scene.camera.view_projection();
        let model = scene.group.model_matrix();

        if let Some(vao) = &self.lines.vao {
            gl.use_program(Some(&self.lines.program));
            gl.bind_vertex_array(Some(vao));
            self.lines.uniforms.set_transform(gl, &view_proj, &model);
            for range in &self.lines.ranges {
                self.lines.uniforms.set_material(gl, range.color, range.opacity);
                gl.draw_arrays(GL::LINE_STRIP, range.first, range.count);
            }
        }

        if let Some(vao) = &self.core.vao {
            gl.use_program(Some(&self.core.program));
            gl.bind_vertex_array(Some(vao));
            self.core.uniforms.set_transform(gl, &view_proj, &model);
            self.core.uniforms.set_material(gl, self.core.color, self.core.opacity);
            self.set_lights(scene);
            gl.draw_elements_with_i32(GL::LINES, self.core.index_count, GL::UNSIGNED_INT, 0);
        }

        gl.bind_vertex_array(None);
        gl.depth_mask(true);
        Ok(())
    }
}
