//! Graphics state stack managed by `q`, `Q` and `cm`.

use unredact_core::Ctm;

use crate::text_state::TextParams;

/// The parts of the graphics state that affect text placement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphicsState {
    pub ctm: Ctm,
    pub text: TextParams,
}

/// Current graphics state plus the states saved by `q`.
#[derive(Debug, Clone, Default)]
pub struct InterpreterState {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl InterpreterState {
    /// Start from an initial CTM, used for Form XObjects.
    pub fn with_ctm(ctm: Ctm) -> Self {
        Self {
            current: GraphicsState {
                ctm,
                ..GraphicsState::default()
            },
            saved: Vec::new(),
        }
    }

    /// State for a Form XObject body: the current state with `matrix`
    /// applied and nothing saved, so the form cannot pop its caller's states.
    pub fn nested(&self, matrix: Ctm) -> Self {
        let mut state = Self {
            current: self.current.clone(),
            saved: Vec::new(),
        };
        state.concat(matrix);
        state
    }

    pub fn ctm(&self) -> Ctm {
        self.current.ctm
    }

    pub fn text(&self) -> &TextParams {
        &self.current.text
    }

    pub fn text_mut(&mut self) -> &mut TextParams {
        &mut self.current.text
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// `q`
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// `Q`. Returns `false` on an unbalanced restore, leaving the state unchanged.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }

    /// `cm`: the new matrix applies before the current CTM.
    pub fn concat(&mut self, m: Ctm) {
        self.current.ctm = m.concat(&self.current.ctm);
    }
}
