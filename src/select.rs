//! Interactive template selection.
//!
//! The user picks a phase, then one theme/step entry of that phase. Any
//! part already given on the command line as `PHASE[/THEME[/STEP]]` is not
//! asked again. Input and output are injected so the flow can be driven by
//! a script in tests.

use crate::config::SystemConfig;
use crate::error::{BsrsError, Result};
use crate::registry::{TemplateEntry, TemplateRegistry};
use std::io::{BufRead, Write};

/// A (partial) template selection parsed from `PHASE[/THEME[/STEP]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub phase: String,
    pub theme: Option<String>,
    pub step: Option<u32>,
}

impl Target {
    /// Parse `PHASE`, `PHASE/THEME` or `PHASE/THEME/STEP`.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            BsrsError::UserError(format!(
                "invalid target '{}': {} (expected PHASE[/THEME[/STEP]])",
                s, reason
            ))
        };

        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() > 3 {
            return Err(invalid("too many parts"));
        }
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid("empty part"));
        }

        let step = match parts.get(2) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => return Err(invalid("step must be a positive number")),
            },
            None => None,
        };

        Ok(Self {
            phase: parts[0].trim().to_string(),
            theme: parts.get(1).map(|t| t.trim().to_string()),
            step,
        })
    }
}

/// Turn-based selector over a template registry.
pub struct Selector<'a, R, W> {
    system: &'a SystemConfig,
    registry: &'a TemplateRegistry,
    input: R,
    output: W,
    max_attempts: u32,
}

impl<'a, R: BufRead, W: Write> Selector<'a, R, W> {
    pub fn new(system: &'a SystemConfig, registry: &'a TemplateRegistry, input: R, output: W) -> Self {
        Self {
            system,
            registry,
            input,
            output,
            max_attempts: system.selection_attempts,
        }
    }

    /// Resolve one template entry, asking for whatever `target` leaves open.
    ///
    /// # Returns
    ///
    /// * `Ok(TemplateEntry)` - The chosen template
    /// * `Err(BsrsError::UserError)` - `target` names an unknown phase, theme or step
    /// * `Err(BsrsError::SelectionAborted)` - Too many invalid answers, or end of input
    pub fn select(&mut self, target: Option<&Target>) -> Result<TemplateEntry> {
        let phase = match target {
            Some(t) => self.checked_phase(&t.phase)?,
            None => self.ask_phase()?,
        };

        let registry = self.registry;
        let mut candidates: Vec<&TemplateEntry> = registry.entries_for_phase(&phase).collect();

        if let Some(theme) = target.and_then(|t| t.theme.as_deref()) {
            candidates.retain(|e| e.theme == theme);
            if candidates.is_empty() {
                return Err(self.unknown("theme", theme, &phase));
            }
        }

        if let Some(step) = target.and_then(|t| t.step) {
            candidates.retain(|e| e.step == step);
            return match candidates.first() {
                Some(entry) => Ok((*entry).clone()),
                None => Err(self.unknown("step", &step.to_string(), &phase)),
            };
        }

        let options: Vec<String> = candidates
            .iter()
            .map(|e| {
                let name = self
                    .system
                    .theme(&e.phase, &e.theme)
                    .map(|t| t.name.as_str())
                    .unwrap_or_default();
                format!("{} step {}  {}", e.theme, e.step, name)
            })
            .collect();
        let index = self.choose("Select a theme and step:", &options)?;
        Ok(candidates[index].clone())
    }

    fn ask_phase(&mut self) -> Result<String> {
        let registry = self.registry;
        let phases: Vec<String> = registry
            .phases()
            .into_iter()
            .map(str::to_string)
            .collect();
        let options: Vec<String> = phases
            .iter()
            .map(|id| match self.system.phase(id) {
                Some(def) => format!("{}  {}", id, def.label),
                None => id.clone(),
            })
            .collect();
        let index = self.choose("Select a phase:", &options)?;
        Ok(phases[index].clone())
    }

    fn checked_phase(&self, phase: &str) -> Result<String> {
        if self.registry.phases().contains(&phase) {
            return Ok(phase.to_string());
        }
        Err(BsrsError::UserError(format!(
            "unknown phase '{}' (available: {})",
            phase,
            self.registry.phases().join(", ")
        )))
    }

    fn unknown(&self, what: &str, value: &str, phase: &str) -> BsrsError {
        let available: Vec<String> = self
            .registry
            .entries_for_phase(phase)
            .map(|e| format!("{}/{}", e.theme, e.step))
            .collect();
        BsrsError::UserError(format!(
            "unknown {} '{}' in phase '{}' (available: {})",
            what,
            value,
            phase,
            available.join(", ")
        ))
    }

    /// Ask for a 1-based choice among `options`, returning its index.
    fn choose(&mut self, title: &str, options: &[String]) -> Result<usize> {
        self.say(&format!("{}\n", title))?;
        for (i, option) in options.iter().enumerate() {
            self.say(&format!("  {:>2}) {}\n", i + 1, option))?;
        }

        let mut invalid = 0;
        loop {
            self.say(&format!("Enter a number [1-{}]: ", options.len()))?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| BsrsError::UserError(format!("failed to read selection: {}", e)))?;
            if read == 0 {
                tracing::debug!("selection input closed");
                return Err(BsrsError::SelectionAborted { attempts: invalid });
            }

            let answer = line.trim();
            if let Ok(n) = answer.parse::<usize>()
                && (1..=options.len()).contains(&n)
            {
                return Ok(n - 1);
            }

            invalid += 1;
            tracing::debug!(answer, invalid, "invalid selection");
            if invalid >= self.max_attempts {
                return Err(BsrsError::SelectionAborted { attempts: invalid });
            }
            self.say(&format!(
                "Invalid choice '{}'. {} attempt(s) left.\n",
                answer,
                self.max_attempts - invalid
            ))?;
        }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|_| self.output.flush())
            .map_err(|e| BsrsError::UserError(format!("failed to write to terminal: {}", e)))
    }
}
