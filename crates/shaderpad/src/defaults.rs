//! Bundled shaders used when no file is supplied on the command line.
//!
//! Fragment shaders receive `fragCoord` in `[0, 1]` plus the `u_time`,
//! `u_mouse`, `u_resolution`, and `u_texture` uniforms, and write
//! `fragColor`. `u_resolution` is normalised against the longer window edge,
//! so `fragCoord / u_resolution` gives square pixels.

use rand::seq::SliceRandom;

/// Standard vertex shader: forwards the quad corner as `fragCoord`.
pub const VERTEX_SHADER: &str = r#"#version 330 core
in vec2 a_pos;
out vec2 fragCoord;
void main() {
    fragCoord = a_pos * 0.5 + 0.5;
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

const SWIRLY: &str = r#"#version 330 core
in vec2 fragCoord;
out vec4 fragColor;
uniform vec2 u_resolution;
uniform float u_time;

vec3 rainbow(float t) {
    return vec3(sin(t)*0.5 + 0.5,
                sin(t + 2.0*3.1415/3.0)*0.5 + 0.5,
                sin(t + 4.0*3.1415/3.0)*0.5 + 0.5);
}

void main() {
    vec2 uv = fragCoord / u_resolution;
    uv = uv * 2.0 - 1.0;

    float angle = atan(uv.y, uv.x) + u_time*0.1;
    float radius = length(uv);

    vec3 color = rainbow(angle);

    radius += 0.1 * sin(u_time + uv.x*10.0);
    radius = clamp(radius, 0.0, 1.0);

    color *= smoothstep(0.8, 0.85, radius);

    fragColor = vec4(color, 1.0);
}
"#;

const SPOTLIGHT: &str = r#"#version 330 core
in vec2 fragCoord;
out vec4 fragColor;
uniform float u_time;
uniform vec2 u_resolution;

void main() {
    vec2 uv = fragCoord / u_resolution - 0.5;

    float silhouette = smoothstep(0.275, 0.25, length(uv-0.3*vec2(cos(u_time),sin(u_time))))
                    -  smoothstep(0.27, 0.25, length(uv-0.5*vec2(cos(u_time),sin(u_time))))
                    -  smoothstep(0.295, 0.3, length(uv-0.25*vec2(cos(2.5*u_time),sin(2.5*u_time))));

    vec3 color = 0.5 + 0.5*cos(u_time+uv.xyx+vec3(1,2,3));

    fragColor = vec4(mix(color, vec3(0.0), silhouette), 1.0);
}
"#;

const WAVES: &str = r#"#version 330 core
in vec2 fragCoord;
out vec4 fragColor;
uniform float u_time;
uniform vec2 u_resolution;

void main() {
    vec2 uv = fragCoord / u_resolution * 3.0 - 1.0;

    float r = pow(pow(uv.x,2.0)+pow(uv.y,2.0),0.5);
    vec3 color = vec3(0.5+0.5*cos(u_time+uv.x+cos(uv.y+u_time)*0.5),
                      0.5*sin(uv.x*0.5+u_time/3.0),
                      0.5*cos(uv.y*0.5+u_time/2.0));
    float f = 0.5+0.5*sin(u_time + r - sin(uv.y+u_time)*3.0 + uv.x);
    vec3 finalColor = mix(color, vec3(1.0), f);

    fragColor = vec4(finalColor, 1.0);
}
"#;

const CLOUDS: &str = r#"#version 330 core
in vec2 fragCoord;
out vec4 fragColor;
uniform float u_time;
uniform vec2 u_resolution;

float hash(float n) { return fract(sin(n) * 43758.5453); }

float noise(vec2 x) {
    vec2 p = floor(x);
    vec2 f = fract(x);
    f = f*f*(3.0-2.0*f);
    float n = p.x + p.y * 57.0;
    return mix(mix(hash(n), hash(n + 1.0), f.x),
               mix(hash(n + 57.0), hash(n + 58.0), f.x), f.y);
}

float fbm(vec2 uv) {
    float f = 0.0;
    f += 0.50000*noise( uv ); uv = uv*2.02;
    f += 0.25000*noise( uv ); uv = uv*2.03;
    f += 0.12500*noise( uv ); uv = uv*2.01;
    f += 0.06250*noise( uv );
    return f;
}

void main() {
    vec2 uv = fragCoord / u_resolution;
    float color = 0.0;

    color += fbm( uv + u_time * 0.1 );
    color += 0.4 * fbm( uv * 3.0 + u_time * 0.05 );
    color += 0.2 * fbm( uv * 13.0 + u_time * 0.2 );

    color = color * 0.5 * (3.0 + fbm(uv + u_time));

    fragColor = vec4(vec3(color*0.5, color*0.6, color), 1.0);
}
"#;

pub const FRAGMENT_SHADERS: [&str; 4] = [SWIRLY, SPOTLIGHT, WAVES, CLOUDS];

pub fn random_fragment() -> &'static str {
    let mut rng = rand::thread_rng();
    FRAGMENT_SHADERS.choose(&mut rng).copied().unwrap_or(SWIRLY)
}
