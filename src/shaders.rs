pub const VERTEX_SHADER_SOURCE: &str = "
	precision highp float;

	attribute vec2 a_coordinates;
	attribute vec2 a_uv;
	varying vec2 v_uv;

	void main() {
	    gl_Position = vec4(a_coordinates, 0.0, 1.0);
	    v_uv = a_uv;
	}
";

pub const SEED_SHADER_SOURCE: &str = "
	precision highp float;

	void main() {
	    gl_FragColor = vec4(0.0, 0.0, 0.012, 0.0);
	}
";

pub const U_RESOLUTION: &str = "u_resolution";
pub const U_POINTER: &str = "u_pointer";
pub const U_PREV_POINTER: &str = "u_prev_pointer";
pub const U_STATE: &str = "u_state";
pub const PHYSICS_SHADER_SOURCE: &str = "
	precision highp float;
	precision highp sampler2D;

	varying vec2 v_uv;

	uniform vec2 u_resolution;
	uniform vec3 u_pointer;
	uniform vec3 u_prev_pointer;
	uniform sampler2D u_state;

	float dist_to_segment(vec2 a, vec2 b, vec2 p) {
	    vec2 v = b - a;
	    vec2 w = p - a;

	    float c1 = dot(w, v);
	    float c2 = dot(v, v);

	    // degenerate segment, or projection before the first endpoint
	    if (c1 <= 0.0 || c2 <= 0.0) {
	        return distance(p, a);
	    }

	    float t = min(c1 / c2, 1.0);
	    return distance(p, a + t * v);
	}

	void main() {
	    vec2 texel = 1.0 / u_resolution;
	    float aspect = u_resolution.x / u_resolution.y;

	    vec4 h = texture2D(u_state, v_uv);

	    // damped spring: acc = -offset * elasticity - vel * viscosity
	    float vel = h.w;
	    vel += -(h.z - 0.012) * 0.016 - vel * 0.056;

	    vec3 s_r = texture2D(u_state, v_uv + vec2(1.0, 0.0) * texel).xyz;
	    vec3 s_l = texture2D(u_state, v_uv - vec2(1.0, 0.0) * texel).xyz;
	    vec3 s_u = texture2D(u_state, v_uv + vec2(0.0, 1.0) * texel).xyz;
	    vec3 s_d = texture2D(u_state, v_uv - vec2(0.0, 1.0) * texel).xyz;

	    // central height differences plus accumulated neighbour slope
	    vec4 dh = vec4(h.z) - vec4(s_r.z, s_l.z, s_u.z, s_d.z);
	    vec2 slope = vec2(dh.x - dh.y, dh.z - dh.w);
	    slope += s_r.xy + s_l.xy + s_u.xy + s_d.xy;
	    slope *= 0.976; // energy dissipation

	    // height contribution of the neighbour slopes along the inward axes
	    float lift = s_l.x - s_r.x + s_d.y - s_u.y;

	    vec3 f = vec3(slope, lift) * 0.25;
	    f.z += h.z + vel;

	    float dist = dist_to_segment(
	        vec2(u_prev_pointer.x * aspect, u_prev_pointer.y),
	        vec2(u_pointer.x * aspect, u_pointer.y),
	        vec2(v_uv.x * aspect, v_uv.y)
	    );

	    if (u_pointer.z > 0.5 && dist <= 0.065) {
	        float t = (0.065 - dist) / 0.065;
	        f.z += pow(abs(t), 1.9) * 0.9 * 2.5;
	        f.xy -= f.xy * pow(abs(t), 3.9) * 0.1;
	        f.z = min(0.9, f.z);
	    }

	    gl_FragColor = clamp(vec4(f, vel), -1.0, 1.0);
	}
";

pub const LIGHTING_SHADER_SOURCE: &str = "
	precision highp float;
	precision highp sampler2D;

	#define RECIPROCAL_PI 0.31830988618

	varying vec2 v_uv;

	uniform sampler2D u_state;

	float hash(vec2 p) {
	    return fract(sin(dot(p, vec2(12.9898, 78.233))) * 43758.5453);
	}

	// per-pixel noise masking the colour banding of the soft gradients
	vec3 dither(vec3 color) {
	    float grid = hash(gl_FragCoord.xy);
	    vec3 shift = vec3(0.25 / 255.0, -0.25 / 255.0, 0.25 / 255.0);
	    shift = mix(2.0 * shift, -2.0 * shift, grid);
	    return color + shift;
	}

	void main() {
	    vec3 n = texture2D(u_state, v_uv).xyz;

	    vec3 view_pos = vec3(0.0, 0.0, 1.2);
	    vec3 light_pos = vec3(0.0, 1.5, 0.98);
	    vec3 frag_pos = vec3(2.0 * v_uv - 1.0, n.z);

	    vec3 l = normalize(light_pos - frag_pos);
	    vec3 half_vec = normalize(l + normalize(view_pos - frag_pos));
	    vec3 shading_normal = vec3(n.xy, n.z / 2.0 + 0.28);

	    float diffuse = max(dot(shading_normal, l), 0.0);
	    float spec = clamp(dot(normalize(n), half_vec), 0.0, 1.0);

	    float attenuation = 1.0 - length(light_pos - frag_pos) / 3.1;
	    vec3 diffuse_term = vec3(diffuse * 0.3 * attenuation);

	    float shininess = 2.8;
	    float ref = RECIPROCAL_PI * (shininess * 0.5 + 1.0) * pow(spec, shininess);
	    vec3 spec_term = vec3(ref * 0.6 * pow(attenuation, 3.0));

	    vec3 color = diffuse_term + spec_term;

	    color.r = mix(color.r * 1.28, color.r, length(diffuse_term) * 1.2 / 3.0);
	    color += 0.045;

	    gl_FragColor = vec4(dither(color), 1.0);
	}
";
