//! Template-based GLSL generator.
//!
//! Each stage has a fixed template with `//PLACEHOLDER` lines that are replaced with
//! snippets derived from the descriptor, the job and the variant:
//!
//! - `//VERSION` - `#version` line for the shader model and code generation API
//! - `//DEFINES` - variant, shading, blending and domain defines
//! - `//ATTRIBUTES` - vertex inputs for the required attributes (vertex only)
//! - `//VARIABLES` - custom interpolated variables
//! - `//PARAMETERS` - material uniform block and samplers
//! - `//MATERIAL` - user shading code (or the default entry point)

use matforge_shared::{
    AttributeSet, BlendingMode, CodeGenJob, Interpolation, Parameter, Precision, SamplerFormat,
    SamplerType, ShaderModel, ShaderStage, TargetApi, UniformType, Variant, VertexDomain,
};

use super::{GenerationError, ShaderGenerator};
use crate::descriptor::{MaterialDescriptor, ShaderSource};

const VERTEX_TEMPLATE: &str = r#"//VERSION
//DEFINES
struct MaterialVertexInputs {
    vec4 worldPosition;
};

//FRAME_UNIFORMS
//ATTRIBUTES
//VARIABLES
//PARAMETERS
//MATERIAL
void main() {
    MaterialVertexInputs inputs;
#if defined(VERTEX_DOMAIN_OBJECT)
    inputs.worldPosition = worldFromModel * mesh_position;
#else
    inputs.worldPosition = mesh_position;
#endif
    materialVertex(inputs);
#if defined(VERTEX_DOMAIN_DEVICE)
    gl_Position = inputs.worldPosition;
#else
    gl_Position = clipFromWorld * inputs.worldPosition;
#endif
}
"#;

const FRAGMENT_TEMPLATE: &str = r#"//VERSION
//DEFINES
struct MaterialInputs {
    vec4 baseColor;
};

void prepareMaterial(inout MaterialInputs material) {
}

//VARIABLES
//PARAMETERS
layout(location = 0) out vec4 fragColor;

//MATERIAL
void main() {
    MaterialInputs inputs;
    inputs.baseColor = vec4(1.0);
    material(inputs);
#if defined(BLENDING_MASKED)
    if (inputs.baseColor.a < MASK_THRESHOLD) {
        discard;
    }
#endif
    fragColor = inputs.baseColor;
}
"#;

/// Vertex attribute inputs: (attribute, location, GLSL declaration)
const ATTRIBUTE_INPUTS: &[(AttributeSet, u32, &str)] = &[
    (AttributeSet::POSITION, 0, "vec4 mesh_position"),
    (AttributeSet::TANGENTS, 1, "vec4 mesh_tangents"),
    (AttributeSet::COLOR, 2, "vec4 mesh_color"),
    (AttributeSet::UV0, 3, "vec2 mesh_uv0"),
    (AttributeSet::UV1, 4, "vec2 mesh_uv1"),
    (AttributeSet::BONE_INDICES, 5, "uvec4 mesh_bone_indices"),
    (AttributeSet::BONE_WEIGHTS, 6, "vec4 mesh_bone_weights"),
];

/// Defines emitted for each variant flag
const VARIANT_DEFINES: &[(Variant, &str)] = &[
    (Variant::DIRECTIONAL_LIGHTING, "VARIANT_HAS_DIRECTIONAL_LIGHTING"),
    (Variant::DYNAMIC_LIGHTING, "VARIANT_HAS_DYNAMIC_LIGHTING"),
    (Variant::SHADOW_RECEIVER, "VARIANT_HAS_SHADOWING"),
    (Variant::SKINNING, "VARIANT_HAS_SKINNING"),
    (Variant::DEPTH, "VARIANT_DEPTH"),
];

/// Built-in generator producing GLSL for every shader model.
///
/// Vulkan code generation emits `#version 450` with explicit descriptor sets and
/// separate image/sampler objects; OpenGL emits `#version 410 core` or `#version 300 es`
/// depending on the shader model.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlslGenerator;

impl GlslGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ShaderGenerator for GlslGenerator {
    fn generate(
        &self,
        descriptor: &MaterialDescriptor,
        job: &CodeGenJob,
        variant: Variant,
        stage: ShaderStage,
    ) -> Result<String, GenerationError> {
        if !variant.has_stage(stage) {
            return Err(GenerationError::new(format!(
                "variant {:#04x} has no {} program",
                variant.key(),
                stage
            )));
        }
        let vulkan = match job.codegen_target_api {
            TargetApi::Vulkan => true,
            TargetApi::OpenGl => false,
            TargetApi::All => {
                return Err(GenerationError::new(
                    "code generation target API must be concrete",
                ));
            }
        };

        let (template, source) = match stage {
            ShaderStage::Vertex => (VERTEX_TEMPLATE, &descriptor.material_vertex),
            ShaderStage::Fragment => (FRAGMENT_TEMPLATE, &descriptor.material),
        };

        let mut shader = template.to_string();
        let external = descriptor
            .parameters
            .iter()
            .any(Parameter::is_external_sampler);
        shader = shader.replace(
            "//VERSION",
            &version_line(job.shader_model, vulkan, external),
        );
        shader = shader.replace("//DEFINES", &defines(descriptor, variant));
        shader = shader.replace("//FRAME_UNIFORMS", &frame_uniforms(vulkan));
        shader = shader.replace(
            "//ATTRIBUTES",
            &attributes(descriptor.required_attributes),
        );
        shader = shader.replace(
            "//VARIABLES",
            &variables(descriptor, stage, explicit_varying_locations(job.shader_model, vulkan)),
        );
        shader = shader.replace(
            "//PARAMETERS",
            &parameters(&descriptor.parameters, job.shader_model, vulkan),
        );
        shader = shader.replace("//MATERIAL", &material_code(source));
        Ok(shader)
    }
}

fn version_line(model: ShaderModel, vulkan: bool, external_sampler: bool) -> String {
    match (vulkan, model) {
        (true, _) => "#version 450".to_string(),
        (false, ShaderModel::GlCore41) => "#version 410 core".to_string(),
        (false, ShaderModel::GlEs30) if external_sampler => {
            "#version 300 es\n#extension GL_OES_EGL_image_external_essl3 : require\nprecision highp float;"
                .to_string()
        }
        (false, ShaderModel::GlEs30) => "#version 300 es\nprecision highp float;".to_string(),
    }
}

// ESSL 3.00 only allows locations on vertex inputs and fragment outputs
fn explicit_varying_locations(model: ShaderModel, vulkan: bool) -> bool {
    vulkan || model != ShaderModel::GlEs30
}

fn defines(descriptor: &MaterialDescriptor, variant: Variant) -> String {
    let mut out = String::new();
    for (flag, name) in VARIANT_DEFINES {
        if variant.contains(*flag) {
            out.push_str(&format!("#define {}\n", name));
        }
    }
    if descriptor.is_lit() {
        out.push_str("#define SHADING_LIT\n");
    }
    if descriptor.shadow_multiplier {
        out.push_str("#define HAS_SHADOW_MULTIPLIER\n");
    }
    let blending = match descriptor.blending {
        BlendingMode::Opaque => "BLENDING_OPAQUE",
        BlendingMode::Transparent => "BLENDING_TRANSPARENT",
        BlendingMode::Add => "BLENDING_ADD",
        BlendingMode::Masked => "BLENDING_MASKED",
    };
    out.push_str(&format!("#define {}\n", blending));
    if descriptor.blending == BlendingMode::Masked {
        out.push_str(&format!(
            "#define MASK_THRESHOLD {:?}\n",
            descriptor.mask_threshold
        ));
    }
    let domain = match descriptor.vertex_domain {
        VertexDomain::Object => "VERTEX_DOMAIN_OBJECT",
        VertexDomain::World => "VERTEX_DOMAIN_WORLD",
        VertexDomain::View => "VERTEX_DOMAIN_VIEW",
        VertexDomain::Device => "VERTEX_DOMAIN_DEVICE",
    };
    out.push_str(&format!("#define {}\n", domain));
    out
}

fn frame_uniforms(vulkan: bool) -> String {
    let layout = if vulkan {
        "layout(set = 0, binding = 0, std140)"
    } else {
        "layout(std140)"
    };
    format!(
        "{} uniform FrameUniforms {{\n    mat4 clipFromWorld;\n    mat4 worldFromModel;\n}};\n",
        layout
    )
}

fn attributes(required: AttributeSet) -> String {
    let mut out = String::new();
    for (attribute, location, declaration) in ATTRIBUTE_INPUTS {
        if required.contains(*attribute) {
            out.push_str(&format!(
                "layout(location = {}) in {};\n",
                location, declaration
            ));
        }
    }
    out
}

fn variables(descriptor: &MaterialDescriptor, stage: ShaderStage, locations: bool) -> String {
    let direction = match stage {
        ShaderStage::Vertex => "out",
        ShaderStage::Fragment => "in",
    };
    let qualifier = match descriptor.interpolation {
        Interpolation::Smooth => "",
        Interpolation::Flat => "flat ",
    };
    let mut out = String::new();
    for (variable, name) in descriptor.variables.iter() {
        if locations {
            out.push_str(&format!("layout(location = {}) ", variable.index() + 1));
        }
        out.push_str(&format!("{}{} vec4 {};\n", qualifier, direction, name));
    }
    out
}

fn parameters(parameters: &[Parameter], model: ShaderModel, vulkan: bool) -> String {
    let mut uniforms = String::new();
    let mut samplers = String::new();
    let mut binding = 1;

    for parameter in parameters {
        match parameter {
            Parameter::Uniform {
                name,
                uniform_type,
                size,
            } => {
                let array = if *size > 1 {
                    format!("[{}]", size)
                } else {
                    String::new()
                };
                uniforms.push_str(&format!(
                    "    {} {}{};\n",
                    uniform_type_name(*uniform_type),
                    name,
                    array
                ));
            }
            Parameter::Sampler {
                name,
                sampler_type,
                format,
                ..
            } if vulkan => {
                // Separate image and sampler objects, recombined at the use site
                let (texture, sampler, combined) = separate_sampler_types(*sampler_type, *format);
                samplers.push_str(&format!(
                    "layout(set = 1, binding = {}) uniform {} materialParams_{}_texture;\n",
                    binding, texture, name
                ));
                samplers.push_str(&format!(
                    "layout(set = 1, binding = {}) uniform {} materialParams_{}_sampler;\n",
                    binding + 1,
                    sampler,
                    name
                ));
                samplers.push_str(&format!(
                    "#define materialParams_{0} {1}(materialParams_{0}_texture, materialParams_{0}_sampler)\n",
                    name, combined
                ));
                binding += 2;
            }
            Parameter::Sampler {
                name,
                sampler_type,
                format,
                precision,
            } => {
                samplers.push_str(&format!(
                    "uniform {}{} materialParams_{};\n",
                    precision_prefix(*precision, model),
                    sampler_type_name(*sampler_type, *format, model),
                    name
                ));
            }
        }
    }

    let mut out = String::new();
    if !uniforms.is_empty() {
        let layout = if vulkan {
            "layout(set = 1, binding = 0, std140)"
        } else {
            "layout(std140)"
        };
        out.push_str(&format!(
            "{} uniform MaterialParams {{\n{}}} materialParams;\n",
            layout, uniforms
        ));
    }
    out.push_str(&samplers);
    out
}

fn material_code(source: &ShaderSource) -> String {
    if source.line_offset > 0 {
        format!("#line {}\n{}", source.line_offset, source.code)
    } else {
        source.code.clone()
    }
}

fn uniform_type_name(uniform_type: UniformType) -> &'static str {
    match uniform_type {
        UniformType::Bool => "bool",
        UniformType::Bool2 => "bvec2",
        UniformType::Bool3 => "bvec3",
        UniformType::Bool4 => "bvec4",
        UniformType::Float => "float",
        UniformType::Float2 => "vec2",
        UniformType::Float3 => "vec3",
        UniformType::Float4 => "vec4",
        UniformType::Int => "int",
        UniformType::Int2 => "ivec2",
        UniformType::Int3 => "ivec3",
        UniformType::Int4 => "ivec4",
        UniformType::Uint => "uint",
        UniformType::Uint2 => "uvec2",
        UniformType::Uint3 => "uvec3",
        UniformType::Uint4 => "uvec4",
        UniformType::Mat3 => "mat3",
        UniformType::Mat4 => "mat4",
    }
}

fn sampler_type_name(
    sampler_type: SamplerType,
    format: SamplerFormat,
    model: ShaderModel,
) -> &'static str {
    match (sampler_type, format) {
        (SamplerType::SamplerExternal, _) if model == ShaderModel::GlEs30 => "samplerExternalOES",
        (SamplerType::SamplerExternal, _) => "sampler2D",
        (SamplerType::Sampler2d, SamplerFormat::Int) => "isampler2D",
        (SamplerType::Sampler2d, SamplerFormat::Uint) => "usampler2D",
        (SamplerType::Sampler2d, SamplerFormat::Float) => "sampler2D",
        (SamplerType::Sampler2d, SamplerFormat::Shadow) => "sampler2DShadow",
        (SamplerType::SamplerCubemap, SamplerFormat::Int) => "isamplerCube",
        (SamplerType::SamplerCubemap, SamplerFormat::Uint) => "usamplerCube",
        (SamplerType::SamplerCubemap, SamplerFormat::Float) => "samplerCube",
        (SamplerType::SamplerCubemap, SamplerFormat::Shadow) => "samplerCubeShadow",
    }
}

/// Vulkan declarations for a sampler parameter: (image type, sampler type, combined type)
fn separate_sampler_types(
    sampler_type: SamplerType,
    format: SamplerFormat,
) -> (&'static str, &'static str, &'static str) {
    match (sampler_type, format) {
        (SamplerType::SamplerExternal, _) => ("texture2D", "sampler", "sampler2D"),
        (SamplerType::Sampler2d, SamplerFormat::Int) => ("itexture2D", "sampler", "isampler2D"),
        (SamplerType::Sampler2d, SamplerFormat::Uint) => ("utexture2D", "sampler", "usampler2D"),
        (SamplerType::Sampler2d, SamplerFormat::Float) => ("texture2D", "sampler", "sampler2D"),
        (SamplerType::Sampler2d, SamplerFormat::Shadow) => {
            ("texture2D", "samplerShadow", "sampler2DShadow")
        }
        (SamplerType::SamplerCubemap, SamplerFormat::Int) => {
            ("itextureCube", "sampler", "isamplerCube")
        }
        (SamplerType::SamplerCubemap, SamplerFormat::Uint) => {
            ("utextureCube", "sampler", "usamplerCube")
        }
        (SamplerType::SamplerCubemap, SamplerFormat::Float) => {
            ("textureCube", "sampler", "samplerCube")
        }
        (SamplerType::SamplerCubemap, SamplerFormat::Shadow) => {
            ("textureCube", "samplerShadow", "samplerCubeShadow")
        }
    }
}

// Precision qualifiers only matter for GLSL ES
fn precision_prefix(precision: Precision, model: ShaderModel) -> &'static str {
    if model != ShaderModel::GlEs30 {
        return "";
    }
    match precision {
        Precision::Low => "lowp ",
        Precision::Medium => "mediump ",
        Precision::High => "highp ",
        Precision::Default => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{MaterialDraft, normalize};
    use matforge_shared::{Property, Variable};

    fn descriptor() -> MaterialDescriptor {
        let mut draft = MaterialDraft {
            name: "test".to_string(),
            ..Default::default()
        };
        draft
            .parameters
            .insert(Parameter::uniform("tint", UniformType::Float4))
            .unwrap();
        draft
            .parameters
            .insert(Parameter::sampler(
                "albedo",
                SamplerType::Sampler2d,
                SamplerFormat::Float,
                Precision::Medium,
            ))
            .unwrap();
        draft.variables.set(Variable::Custom0, "eyeDirection");
        draft.properties.set(Property::BaseColor);
        normalize(&draft).unwrap()
    }

    fn gl_core() -> CodeGenJob {
        CodeGenJob::new(ShaderModel::GlCore41, TargetApi::OpenGl, TargetApi::OpenGl)
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = GlslGenerator::new();
        let d = descriptor();
        let a = generator
            .generate(&d, &gl_core(), Variant::BASELINE, ShaderStage::Fragment)
            .unwrap();
        let b = generator
            .generate(&d, &gl_core(), Variant::BASELINE, ShaderStage::Fragment)
            .unwrap();
        assert_eq!(a, b);
        assert!(!a.contains("//"), "unreplaced placeholder in:\n{a}");
    }

    #[test]
    fn test_version_follows_model_and_api() {
        let generator = GlslGenerator::new();
        let d = descriptor();

        let core = generator
            .generate(&d, &gl_core(), Variant::BASELINE, ShaderStage::Vertex)
            .unwrap();
        assert!(core.starts_with("#version 410 core"));

        let es = CodeGenJob::new(ShaderModel::GlEs30, TargetApi::OpenGl, TargetApi::OpenGl);
        let es = generator
            .generate(&d, &es, Variant::BASELINE, ShaderStage::Fragment)
            .unwrap();
        assert!(es.starts_with("#version 300 es"));
        assert!(es.contains("uniform mediump sampler2D materialParams_albedo;"));

        let vk = CodeGenJob::new(ShaderModel::GlEs30, TargetApi::OpenGl, TargetApi::Vulkan);
        let vk = generator
            .generate(&d, &vk, Variant::BASELINE, ShaderStage::Fragment)
            .unwrap();
        assert!(vk.starts_with("#version 450"));
        assert!(vk.contains(
            "layout(set = 1, binding = 1) uniform texture2D materialParams_albedo_texture;"
        ));
        assert!(vk.contains(
            "layout(set = 1, binding = 2) uniform sampler materialParams_albedo_sampler;"
        ));
        assert!(vk.contains(
            "#define materialParams_albedo sampler2D(materialParams_albedo_texture, materialParams_albedo_sampler)"
        ));
        assert!(!vk.contains("mediump"));
    }

    #[test]
    fn test_gles_external_sampler_and_varyings() {
        let mut draft = MaterialDraft::default();
        draft
            .parameters
            .insert(Parameter::sampler(
                "camera",
                SamplerType::SamplerExternal,
                SamplerFormat::Float,
                Precision::Default,
            ))
            .unwrap();
        draft.variables.set(Variable::Custom0, "eyeDirection");
        let d = normalize(&draft).unwrap();
        let generator = GlslGenerator::new();

        let es = CodeGenJob::new(ShaderModel::GlEs30, TargetApi::OpenGl, TargetApi::OpenGl);
        let vs = generator
            .generate(&d, &es, Variant::BASELINE, ShaderStage::Vertex)
            .unwrap();
        assert!(vs.starts_with(
            "#version 300 es\n#extension GL_OES_EGL_image_external_essl3 : require\n"
        ));
        assert!(vs.contains("uniform samplerExternalOES materialParams_camera;"));
        assert!(vs.contains("\nout vec4 eyeDirection;"));
        assert!(!vs.contains("layout(location = 1) out"));
        assert!(vs.contains("layout(location = 0) in vec4 mesh_position;"));

        let core = generator
            .generate(&d, &gl_core(), Variant::BASELINE, ShaderStage::Vertex)
            .unwrap();
        assert!(!core.contains("#extension"));
        assert!(core.contains("uniform sampler2D materialParams_camera;"));
        assert!(core.contains("layout(location = 1) out vec4 eyeDirection;"));
    }

    #[test]
    fn test_variant_defines_and_stage_inputs() {
        let generator = GlslGenerator::new();
        let d = descriptor();
        let vs = generator
            .generate(
                &d,
                &gl_core(),
                Variant::SKINNING | Variant::SHADOW_RECEIVER,
                ShaderStage::Vertex,
            )
            .unwrap();
        assert!(vs.contains("#define VARIANT_HAS_SKINNING"));
        assert!(vs.contains("#define VARIANT_HAS_SHADOWING"));
        assert!(!vs.contains("VARIANT_HAS_DYNAMIC_LIGHTING"));
        assert!(vs.contains("layout(location = 0) in vec4 mesh_position;"));
        assert!(vs.contains("layout(location = 1) out vec4 eyeDirection;"));
        assert!(vs.contains("vec4 tint;"));
    }

    #[test]
    fn test_missing_stage_is_an_error() {
        let generator = GlslGenerator::new();
        let result = generator.generate(
            &descriptor(),
            &gl_core(),
            Variant::DEPTH,
            ShaderStage::Fragment,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_material_code_keeps_line_offset() {
        let mut draft = MaterialDraft::default();
        draft.material = ShaderSource::new(
            "void material(inout MaterialInputs material) {\n    prepareMaterial(material);\n    material.baseColor.rgb = vec3(0.5);\n}\n",
            42,
        );
        let d = normalize(&draft).unwrap();
        let fs = GlslGenerator::new()
            .generate(&d, &gl_core(), Variant::BASELINE, ShaderStage::Fragment)
            .unwrap();
        assert!(fs.contains("#line 42\nvoid material("));
        assert!(fs.contains("vec3(0.5)"));
    }
}
