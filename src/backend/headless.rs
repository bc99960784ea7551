// Headless context - an in-memory stand-in for a GL driver
//
// Keeps the same tables a driver keeps (handles, bindings, buffer storage,
// attribute pointers) and raises the same sticky error flag when a call is
// made in the wrong state. Used by the tests and the demo binary.
//
// The "compiler" only checks structure: a #version line, a main entry
// point, balanced brackets. The "linker" checks stages and that every
// fragment input has a matching vertex output.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::num::NonZeroU32;

use parking_lot::Mutex;

use super::context::{
    BufferTarget, BufferUsage, ComponentType, ContextError, GraphicsContext, IndexType,
    PrimitiveMode, ShaderStage,
};

/// GL guarantees at least 16 attribute slots.
pub const MAX_VERTEX_ATTRIBS: u32 = 16;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            pub fn get(self) -> u32 {
                self.0.get()
            }
        }
    };
}

handle!(
    /// Shader handle handed out by [`HeadlessContext`].
    ShaderId
);
handle!(
    /// Program handle handed out by [`HeadlessContext`].
    ProgramId
);
handle!(
    /// Buffer handle handed out by [`HeadlessContext`].
    BufferId
);
handle!(
    /// Vertex array handle handed out by [`HeadlessContext`].
    VertexArrayId
);

/// Attribute pointer state recorded by `vertex_attrib_pointer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribPointer {
    pub buffer: BufferId,
    pub count: i32,
    pub component: ComponentType,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
}

/// One successful `draw_elements` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub mode: PrimitiveMode,
    pub count: i32,
    pub index_type: IndexType,
    pub offset: i32,
    pub program: ProgramId,
    pub vertex_array: VertexArrayId,
}

struct ShaderRecord {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
    /// Deleted while still attached somewhere; freed once detached.
    delete_pending: bool,
}

#[derive(Default)]
struct ProgramRecord {
    attached: Vec<ShaderId>,
    linked: bool,
    log: String,
}

struct BufferRecord {
    data: Vec<u8>,
    usage: Option<BufferUsage>,
}

#[derive(Default)]
struct VertexArrayRecord {
    element_buffer: Option<BufferId>,
    pointers: BTreeMap<u32, AttribPointer>,
    enabled: BTreeSet<u32>,
}

#[derive(Default)]
struct State {
    last_id: u32,
    shaders: HashMap<ShaderId, ShaderRecord>,
    programs: HashMap<ProgramId, ProgramRecord>,
    buffers: HashMap<BufferId, BufferRecord>,
    vertex_arrays: HashMap<VertexArrayId, VertexArrayRecord>,

    // Binding table
    array_buffer: Option<BufferId>,
    /// Element binding while no vertex array is bound.
    loose_element_buffer: Option<BufferId>,
    vertex_array: Option<VertexArrayId>,
    program: Option<ProgramId>,

    error: Option<ContextError>,
    draws: Vec<DrawCall>,
}

impl State {
    fn next_id(&mut self) -> Result<NonZeroU32, String> {
        self.last_id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| "out of handles".to_string())?;
        NonZeroU32::new(self.last_id).ok_or_else(|| "out of handles".to_string())
    }

    /// GL keeps the first error until it is read.
    fn raise(&mut self, error: ContextError) {
        log::debug!("Headless context error: {:?}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn element_binding(&self) -> Option<BufferId> {
        match self.vertex_array {
            Some(vao) => self.vertex_arrays.get(&vao).and_then(|record| record.element_buffer),
            None => self.loose_element_buffer,
        }
    }

    fn set_element_binding(&mut self, buffer: Option<BufferId>) {
        match self.vertex_array {
            Some(vao) => {
                if let Some(record) = self.vertex_arrays.get_mut(&vao) {
                    record.element_buffer = buffer;
                }
            }
            None => self.loose_element_buffer = buffer,
        }
    }

    fn release_detached_shaders(&mut self) {
        let attached: BTreeSet<ShaderId> = self
            .programs
            .values()
            .flat_map(|program| program.attached.iter().copied())
            .collect();
        self.shaders
            .retain(|id, shader| !shader.delete_pending || attached.contains(id));
    }
}

/// In-memory graphics context.
#[derive(Default)]
pub struct HeadlessContext {
    state: Mutex<State>,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn live_shaders(&self) -> usize {
        self.state.lock().shaders.values().filter(|s| !s.delete_pending).count()
    }

    pub fn live_programs(&self) -> usize {
        self.state.lock().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.lock().buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.lock().vertex_arrays.len()
    }

    /// Current storage of a buffer; empty until the first upload.
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.state.lock().buffers.get(&buffer).map(|record| record.data.clone())
    }

    pub fn buffer_usage(&self, buffer: BufferId) -> Option<BufferUsage> {
        self.state.lock().buffers.get(&buffer).and_then(|record| record.usage)
    }

    pub fn attrib_pointer(&self, vertex_array: VertexArrayId, index: u32) -> Option<AttribPointer> {
        let state = self.state.lock();
        state.vertex_arrays.get(&vertex_array)?.pointers.get(&index).copied()
    }

    pub fn is_attrib_enabled(&self, vertex_array: VertexArrayId, index: u32) -> bool {
        let state = self.state.lock();
        state
            .vertex_arrays
            .get(&vertex_array)
            .is_some_and(|record| record.enabled.contains(&index))
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.state.lock().program
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state.lock().draws.clone()
    }
}

impl GraphicsContext for HeadlessContext {
    type Shader = ShaderId;
    type Program = ProgramId;
    type Buffer = BufferId;
    type VertexArray = VertexArrayId;

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        let mut state = self.state.lock();
        let id = ShaderId(state.next_id()?);
        state.shaders.insert(
            id,
            ShaderRecord {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
                delete_pending: false,
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        let mut state = self.state.lock();
        match state.shaders.get_mut(&shader) {
            Some(record) => record.source = source.to_string(),
            None => state.raise(ContextError::InvalidValue),
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        let mut state = self.state.lock();
        match state.shaders.get_mut(&shader) {
            Some(record) => match glsl::check_structure(&record.source) {
                Ok(()) => {
                    record.compiled = true;
                    record.log.clear();
                }
                Err(log) => {
                    record.compiled = false;
                    record.log = log;
                }
            },
            None => state.raise(ContextError::InvalidValue),
        }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.state.lock().shaders.get(&shader).is_some_and(|record| record.compiled)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        let state = self.state.lock();
        state.shaders.get(&shader).map(|record| record.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        let mut state = self.state.lock();
        match state.shaders.get_mut(&shader) {
            Some(record) => record.delete_pending = true,
            None => return,
        }
        state.release_detached_shaders();
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        let mut state = self.state.lock();
        let id = ProgramId(state.next_id()?);
        state.programs.insert(id, ProgramRecord::default());
        Ok(id)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.lock();
        if !state.shaders.contains_key(&shader) {
            state.raise(ContextError::InvalidValue);
            return;
        }
        let error = match state.programs.get_mut(&program) {
            Some(record) if record.attached.contains(&shader) => Some(ContextError::InvalidOperation),
            Some(record) => {
                record.attached.push(shader);
                None
            }
            None => Some(ContextError::InvalidValue),
        };
        if let Some(error) = error {
            state.raise(error);
        }
    }

    fn link_program(&self, program: ProgramId) {
        let mut state = self.state.lock();
        let Some(record) = state.programs.get(&program) else {
            state.raise(ContextError::InvalidValue);
            return;
        };

        let stages: Vec<(ShaderStage, bool, &str)> = record
            .attached
            .iter()
            .filter_map(|id| state.shaders.get(id))
            .map(|shader| (shader.stage, shader.compiled, shader.source.as_str()))
            .collect();
        let result = glsl::check_link(&stages);

        if let Some(record) = state.programs.get_mut(&program) {
            match result {
                Ok(()) => {
                    record.linked = true;
                    record.log.clear();
                }
                Err(log) => {
                    record.linked = false;
                    record.log = log;
                }
            }
        }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.state.lock().programs.get(&program).is_some_and(|record| record.linked)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        let state = self.state.lock();
        state.programs.get(&program).map(|record| record.log.clone()).unwrap_or_default()
    }

    fn use_program(&self, program: Option<ProgramId>) {
        let mut state = self.state.lock();
        match program {
            None => state.program = None,
            Some(id) => match state.programs.get(&id).map(|record| record.linked) {
                Some(true) => state.program = Some(id),
                Some(false) => state.raise(ContextError::InvalidOperation),
                None => state.raise(ContextError::InvalidValue),
            },
        }
    }

    fn delete_program(&self, program: ProgramId) {
        let mut state = self.state.lock();
        if state.programs.remove(&program).is_some() {
            if state.program == Some(program) {
                state.program = None;
            }
            state.release_detached_shaders();
        }
    }

    fn create_buffer(&self) -> Result<BufferId, String> {
        let mut state = self.state.lock();
        let id = BufferId(state.next_id()?);
        state.buffers.insert(id, BufferRecord { data: Vec::new(), usage: None });
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        let mut state = self.state.lock();
        if let Some(id) = buffer {
            if !state.buffers.contains_key(&id) {
                state.raise(ContextError::InvalidOperation);
                return;
            }
        }
        match target {
            BufferTarget::ArrayBuffer => state.array_buffer = buffer,
            BufferTarget::ElementArrayBuffer => state.set_element_binding(buffer),
        }
    }

    fn bound_buffer(&self, target: BufferTarget) -> Option<BufferId> {
        let state = self.state.lock();
        match target {
            BufferTarget::ArrayBuffer => state.array_buffer,
            BufferTarget::ElementArrayBuffer => state.element_binding(),
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        let mut state = self.state.lock();
        let bound = match target {
            BufferTarget::ArrayBuffer => state.array_buffer,
            BufferTarget::ElementArrayBuffer => state.element_binding(),
        };
        match bound.and_then(|id| state.buffers.get_mut(&id)) {
            Some(record) => {
                record.data = data.to_vec();
                record.usage = Some(usage);
            }
            None => state.raise(ContextError::InvalidOperation),
        }
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let mut state = self.state.lock();
        if state.buffers.remove(&buffer).is_none() {
            return;
        }
        if state.array_buffer == Some(buffer) {
            state.array_buffer = None;
        }
        if state.element_binding() == Some(buffer) {
            state.set_element_binding(None);
        }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, String> {
        let mut state = self.state.lock();
        let id = VertexArrayId(state.next_id()?);
        state.vertex_arrays.insert(id, VertexArrayRecord::default());
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) {
        let mut state = self.state.lock();
        match vertex_array {
            Some(id) if !state.vertex_arrays.contains_key(&id) => {
                state.raise(ContextError::InvalidOperation)
            }
            other => state.vertex_array = other,
        }
    }

    fn bound_vertex_array(&self) -> Option<VertexArrayId> {
        self.state.lock().vertex_array
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        count: i32,
        component: ComponentType,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        let mut state = self.state.lock();
        if index >= MAX_VERTEX_ATTRIBS || !(1..=4).contains(&count) || stride < 0 || offset < 0 {
            state.raise(ContextError::InvalidValue);
            return;
        }
        let (Some(vao), Some(buffer)) = (state.vertex_array, state.array_buffer) else {
            state.raise(ContextError::InvalidOperation);
            return;
        };
        if let Some(record) = state.vertex_arrays.get_mut(&vao) {
            record.pointers.insert(
                index,
                AttribPointer { buffer, count, component, normalized, stride, offset },
            );
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.state.lock();
        if index >= MAX_VERTEX_ATTRIBS {
            state.raise(ContextError::InvalidValue);
            return;
        }
        let Some(vao) = state.vertex_array else {
            state.raise(ContextError::InvalidOperation);
            return;
        };
        if let Some(record) = state.vertex_arrays.get_mut(&vao) {
            record.enabled.insert(index);
        }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayId) {
        let mut state = self.state.lock();
        if state.vertex_arrays.remove(&vertex_array).is_some() && state.vertex_array == Some(vertex_array) {
            state.vertex_array = None;
        }
    }

    fn draw_elements(&self, mode: PrimitiveMode, count: i32, index_type: IndexType, offset: i32) {
        let mut state = self.state.lock();
        if count < 0 || offset < 0 {
            state.raise(ContextError::InvalidValue);
            return;
        }
        let (Some(program), Some(vertex_array)) = (state.program, state.vertex_array) else {
            state.raise(ContextError::InvalidOperation);
            return;
        };
        let Some(elements) = state.element_binding().and_then(|id| state.buffers.get(&id)) else {
            state.raise(ContextError::InvalidOperation);
            return;
        };
        let needed = offset as usize + count as usize * index_type.size();
        let elements_len = elements.data.len();

        let incomplete = state.vertex_arrays.get(&vertex_array).map_or(true, |record| {
            record.enabled.iter().any(|index| {
                record
                    .pointers
                    .get(index)
                    .map_or(true, |pointer| !state.buffers.contains_key(&pointer.buffer))
            })
        });

        if needed > elements_len || incomplete {
            state.raise(ContextError::InvalidOperation);
            return;
        }

        state.draws.push(DrawCall { mode, count, index_type, offset, program, vertex_array });
    }

    fn take_error(&self) -> Option<ContextError> {
        self.state.lock().error.take()
    }
}

/// Structural GLSL checks standing in for a real compiler and linker.
mod glsl {
    use super::ShaderStage;

    const INTERPOLATION: [&str; 5] = ["flat", "smooth", "noperspective", "centroid", "sample"];

    pub fn check_structure(source: &str) -> Result<(), String> {
        let code = strip_comments(source);

        let first = code.lines().position(|line| !line.trim().is_empty());
        match first {
            Some(line) if code.lines().nth(line).is_some_and(|l| l.trim_start().starts_with("#version")) => {}
            Some(line) => return Err(error(line + 1, "#version must be the first directive")),
            None => return Err(error(1, "empty shader source")),
        }

        let mut open: Vec<(char, usize)> = Vec::new();
        for (line_no, line) in code.lines().enumerate() {
            for c in line.chars() {
                match c {
                    '{' | '(' | '[' => open.push((c, line_no + 1)),
                    '}' | ')' | ']' => {
                        let expected = match c {
                            '}' => '{',
                            ')' => '(',
                            _ => '[',
                        };
                        match open.pop() {
                            Some((o, _)) if o == expected => {}
                            _ => return Err(error(line_no + 1, &format!("syntax error, unexpected '{c}'"))),
                        }
                    }
                    _ => {}
                }
            }
        }
        if let Some((c, line)) = open.pop() {
            return Err(error(line, &format!("unexpected end of file, unclosed '{c}'")));
        }

        let collapsed = code.split_whitespace().collect::<Vec<_>>().join(" ").replace(" (", "(");
        if !collapsed.contains("void main(") {
            let last = code.lines().count().max(1);
            return Err(error(last, "no function with name 'main'"));
        }

        Ok(())
    }

    /// `stages` holds (stage, compiled, source) for every attached shader.
    pub fn check_link(stages: &[(ShaderStage, bool, &str)]) -> Result<(), String> {
        if let Some(position) = stages.iter().position(|(_, compiled, _)| !compiled) {
            return Err(format!("error: attached shader #{position} is not compiled\n"));
        }

        let mut problems = Vec::new();
        for (i, (stage, _, _)) in stages.iter().enumerate() {
            if stages[..i].iter().any(|(earlier, _, _)| earlier == stage) {
                problems.push(format!("error: more than one {stage:?} shader attached"));
            }
        }
        let find = |wanted: ShaderStage| stages.iter().find(|(stage, _, _)| *stage == wanted);
        let vertex = find(ShaderStage::Vertex);
        let fragment = find(ShaderStage::Fragment);
        if vertex.is_none() {
            problems.push("error: missing vertex shader".to_string());
        }
        if fragment.is_none() {
            problems.push("error: missing fragment shader".to_string());
        }

        let has_geometry = find(ShaderStage::Geometry).is_some();
        if let (Some((_, _, vs)), Some((_, _, fs)), false) = (vertex, fragment, has_geometry) {
            let outputs = declarations(vs, "out");
            for (ty, name) in declarations(fs, "in") {
                match outputs.iter().find(|(_, out_name)| *out_name == name) {
                    Some((out_ty, _)) if *out_ty != ty => problems.push(format!(
                        "error: type mismatch for '{name}': vertex output is {out_ty}, fragment input is {ty}"
                    )),
                    Some(_) => {}
                    None => problems.push(format!(
                        "error: fragment input '{name}' has no matching vertex output"
                    )),
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("\n") + "\n")
        }
    }

    /// Global `in`/`out` variables as (type, name).
    fn declarations(source: &str, storage: &str) -> Vec<(String, String)> {
        let code = strip_comments(source);
        let mut found = Vec::new();

        for statement in code.split(';') {
            // Drop preprocessor lines and anything up to the last block boundary
            let statement: String = statement
                .lines()
                .filter(|line| !line.trim_start().starts_with('#'))
                .collect::<Vec<_>>()
                .join(" ");
            let statement = match statement.rfind(|c| c == '{' || c == '}') {
                Some(pos) => &statement[pos + 1..],
                None => statement.as_str(),
            };
            let mut rest = statement.trim();
            if rest.starts_with("layout") {
                match rest.find(')') {
                    Some(close) => rest = rest[close + 1..].trim(),
                    None => continue,
                }
            }

            let tokens: Vec<&str> = rest
                .split_whitespace()
                .filter(|token| !INTERPOLATION.contains(token))
                .collect();
            if let [qualifier, ty, name] = tokens.as_slice() {
                if *qualifier == storage {
                    let name: &str = name;
                    let name = name.split('[').next().unwrap_or(name);
                    found.push((ty.to_string(), name.to_string()));
                }
            }
        }
        found
    }

    /// Remove comments, keeping newlines so line numbers stay right.
    fn strip_comments(source: &str) -> String {
        let mut out = String::with_capacity(source.len());
        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            let next = chars.peek().copied();
            match (c, next) {
                ('/', Some('/')) => {
                    for next in chars.by_ref() {
                        if next == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                }
                ('/', Some('*')) => {
                    chars.next();
                    let mut prev = ' ';
                    for next in chars.by_ref() {
                        if next == '\n' {
                            out.push('\n');
                        }
                        if prev == '*' && next == '/' {
                            break;
                        }
                        prev = next;
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }

    fn error(line: usize, message: &str) -> String {
        format!("0:{line}: error: {message}\n")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn structure_errors_carry_a_line() {
            let log = check_structure("#version 330 core\nvoid main() {\n  x = 1 + 2);\n}\n").unwrap_err();
            assert!(log.starts_with("0:3: error:"), "{log}");

            let log = check_structure("void main() {}").unwrap_err();
            assert!(log.contains("#version"), "{log}");

            let log = check_structure("#version 330 core\nvoid helper() {}\n").unwrap_err();
            assert!(log.contains("main"), "{log}");
        }

        #[test]
        fn comments_do_not_count() {
            let src = "// header\n#version 330 core\n/* { unbalanced\n in a comment */\nvoid main () { }\n";
            assert_eq!(check_structure(src), Ok(()));
        }

        #[test]
        fn declarations_skip_layout_and_interpolation() {
            let src = "#version 330 core\nlayout(location = 0) in vec3 aPos;\nflat out int vId;\nout vec2 vUv[2];\nvoid main() { }\n";
            assert_eq!(
                declarations(src, "out"),
                vec![("int".to_string(), "vId".to_string()), ("vec2".to_string(), "vUv".to_string())]
            );
            assert_eq!(declarations(src, "in"), vec![("vec3".to_string(), "aPos".to_string())]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_binding_belongs_to_the_vertex_array() {
        let ctx = HeadlessContext::new();
        let vao = ctx.create_vertex_array().unwrap();
        let ebo = ctx.create_buffer().unwrap();

        ctx.bind_vertex_array(Some(vao));
        ctx.bind_buffer(BufferTarget::ElementArrayBuffer, Some(ebo));
        ctx.bind_vertex_array(None);
        assert_eq!(ctx.bound_buffer(BufferTarget::ElementArrayBuffer), None);

        ctx.bind_vertex_array(Some(vao));
        assert_eq!(ctx.bound_buffer(BufferTarget::ElementArrayBuffer), Some(ebo));
        assert_eq!(ctx.take_error(), None);
    }

    #[test]
    fn upload_without_binding_raises_invalid_operation() {
        let ctx = HeadlessContext::new();
        ctx.buffer_data(BufferTarget::ArrayBuffer, &[1, 2, 3], BufferUsage::StaticDraw);
        assert_eq!(ctx.take_error(), Some(ContextError::InvalidOperation));
        // Reading the flag clears it
        assert_eq!(ctx.take_error(), None);
    }

    #[test]
    fn first_error_sticks() {
        let ctx = HeadlessContext::new();
        ctx.enable_vertex_attrib_array(MAX_VERTEX_ATTRIBS);
        ctx.enable_vertex_attrib_array(0);
        assert_eq!(ctx.take_error(), Some(ContextError::InvalidValue));
    }

    #[test]
    fn attrib_pointer_needs_vertex_array_and_buffer() {
        let ctx = HeadlessContext::new();
        ctx.vertex_attrib_pointer(0, 3, ComponentType::Float, false, 12, 0);
        assert_eq!(ctx.take_error(), Some(ContextError::InvalidOperation));

        let vao = ctx.create_vertex_array().unwrap();
        ctx.bind_vertex_array(Some(vao));
        ctx.vertex_attrib_pointer(0, 5, ComponentType::Float, false, 12, 0);
        assert_eq!(ctx.take_error(), Some(ContextError::InvalidValue));
    }

    #[test]
    fn unlinked_program_cannot_be_used() {
        let ctx = HeadlessContext::new();
        let program = ctx.create_program().unwrap();
        ctx.use_program(Some(program));
        assert_eq!(ctx.take_error(), Some(ContextError::InvalidOperation));
        assert_eq!(ctx.current_program(), None);
    }

    #[test]
    fn shader_deletion_waits_for_detach() {
        let ctx = HeadlessContext::new();
        let shader = ctx.create_shader(ShaderStage::Vertex).unwrap();
        let program = ctx.create_program().unwrap();
        ctx.attach_shader(program, shader);

        ctx.delete_shader(shader);
        assert_eq!(ctx.live_shaders(), 0);
        // Still known to the program
        ctx.shader_source(shader, "#version 330 core\nvoid main() {}\n");
        assert_eq!(ctx.take_error(), None);

        ctx.delete_program(program);
        ctx.shader_source(shader, "");
        assert_eq!(ctx.take_error(), Some(ContextError::InvalidValue));
    }

    #[test]
    fn draw_without_index_buffer_fails() {
        let ctx = HeadlessContext::new();
        let vao = ctx.create_vertex_array().unwrap();
        ctx.bind_vertex_array(Some(vao));
        ctx.draw_elements(PrimitiveMode::Triangles, 6, IndexType::U32, 0);
        assert_eq!(ctx.take_error(), Some(ContextError::InvalidOperation));
        assert!(ctx.draw_calls().is_empty());
    }
}
