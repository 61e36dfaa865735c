// @module: Override block stripping for ASS dialogue text

/// Drawing commands that switch vector drawing mode on.
const DRAWING_ON_COMMANDS: [&str; 4] = ["\\p1", "\\p2", "\\p3", "\\p4"];

/// Drawing command that switches vector drawing mode off.
const DRAWING_OFF_COMMAND: &str = "\\p0";

// @struct: Scanner state for one dialogue fragment
#[derive(Debug, Default)]
struct StripState {
    // @field: Bracket depth, not clamped
    depth: i32,

    // @field: Vector drawing mode
    drawing: bool,

    // @field: Text seen since the last `{` while depth is not zero
    block: String,
}

impl StripState {
    // @updates: Drawing flag from a finished block
    fn close_block(&mut self) {
        self.depth -= 1;

        // Commands are tested in a fixed order, not by position in the block
        for command in DRAWING_ON_COMMANDS {
            if self.block.contains(command) {
                self.drawing = true;
            }
        }
        if self.block.contains(DRAWING_OFF_COMMAND) {
            self.drawing = false;
        }
    }
}

/// Remove `{...}` override blocks from a raw dialogue fragment.
///
/// Text written while vector drawing mode is active (`\p1`..`\p4` until
/// `\p0`) is dropped as well, since it is drawing payload rather than
/// dialogue. Unbalanced braces are tolerated: a stray `}` drives the depth
/// negative and suppresses output until a matching `{` brings it back.
pub fn strip_override_tags(text: &str) -> String {
    let mut state = StripState::default();
    let mut out = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '{' => {
                state.depth += 1;
                state.block.clear();
            }
            '}' => state.close_block(),
            _ => {
                if state.depth == 0 && !state.drawing {
                    out.push(ch);
                } else if state.depth != 0 {
                    state.block.push(ch);
                }
            }
        }
    }

    out
}
