//! Line-oriented editing session over a loaded board.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use protoboard::{
    save_board, write_svg, BoardDocument, Coord, DrcEngine, Jumper, RandomColorSource,
    RenderOptions, Rotation,
};

const HELP: &str = "\
Commands:
  list                                   - list components
  select <ref>                           - select component
  move <dx> <dy>                         - move selected component
  rotate <deg>                           - rotate selected component by 90/180/270
  jumper add <id> <net> <ax> <ay> <bx> <by> - add a jumper
  jumper rm <id>                         - remove a jumper
  check                                  - run design-rule checks
  render [file]                          - render board.svg
  save                                   - save the board file
  quit                                   - exit";

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    document: BoardDocument,
    board_path: PathBuf,
    svg_path: PathBuf,
    selected: Option<String>,
    engine: DrcEngine,
    colors: RandomColorSource,
    render_options: RenderOptions,
}

impl Session {
    pub fn new(document: BoardDocument, board_path: PathBuf) -> Self {
        let svg_path = board_path.with_file_name("board.svg");
        Self {
            document,
            board_path,
            svg_path,
            selected: None,
            engine: DrcEngine::with_default_checks(),
            colors: RandomColorSource::from_entropy(),
            render_options: RenderOptions::default(),
        }
    }

    #[cfg(test)]
    fn with_colors(mut self, colors: RandomColorSource) -> Self {
        self.colors = colors;
        self
    }

    /// Execute one command line.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> io::Result<Flow> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = parts.split_first() else {
            return Ok(Flow::Continue);
        };

        match name {
            "help" => writeln!(out, "{}", HELP)?,
            "list" => self.cmd_list(out)?,
            "select" => self.cmd_select(args, out)?,
            "move" => {
                if self.cmd_move(args, out)? {
                    self.cmd_check(out)?;
                }
            }
            "rotate" => {
                if self.cmd_rotate(args, out)? {
                    self.cmd_check(out)?;
                }
            }
            "jumper" => self.cmd_jumper(args, out)?,
            "check" => self.cmd_check(out)?,
            "render" => self.cmd_render(args, out)?,
            "save" => self.cmd_save(out)?,
            "quit" | "exit" => {
                writeln!(out, "bye")?;
                return Ok(Flow::Quit);
            }
            other => writeln!(out, "unknown command '{}' (type 'help')", other)?,
        }
        Ok(Flow::Continue)
    }

    fn cmd_list(&self, out: &mut dyn Write) -> io::Result<()> {
        for c in self.document.board.components() {
            let mark = if self.selected.as_deref() == Some(c.reference()) {
                "*"
            } else {
                " "
            };
            writeln!(
                out,
                "{} {} @ {} rot {} [{}]",
                mark,
                c.reference(),
                c.origin,
                c.rotation,
                c.footprint().name
            )?;
        }
        for j in self.document.board.jumpers() {
            writeln!(out, "  jumper {} ({}) {} -> {}", j.id, j.net, j.a, j.b)?;
        }
        Ok(())
    }

    fn cmd_select(&mut self, args: &[&str], out: &mut dyn Write) -> io::Result<()> {
        let [reference] = args else {
            return writeln!(out, "usage: select <ref>");
        };
        if self.document.board.component(reference).is_some() {
            self.selected = Some(reference.to_string());
            writeln!(out, "selected {}", reference)
        } else {
            writeln!(out, "component '{}' not found", reference)
        }
    }

    fn cmd_move(&mut self, args: &[&str], out: &mut dyn Write) -> io::Result<bool> {
        let [dx, dy] = args else {
            writeln!(out, "usage: move <dx> <dy>")?;
            return Ok(false);
        };
        let (Ok(dx), Ok(dy)) = (dx.parse::<i32>(), dy.parse::<i32>()) else {
            writeln!(out, "dx and dy must be integers")?;
            return Ok(false);
        };
        let Some(component) = self.selected_component() else {
            writeln!(out, "no component selected")?;
            return Ok(false);
        };
        if let Err(e) = component.move_by(dx, dy) {
            writeln!(out, "error: {}", e)?;
            return Ok(false);
        }
        let (reference, origin) = (component.reference().to_string(), component.origin);
        writeln!(out, "{} moved to {}", reference, origin)?;
        Ok(true)
    }

    fn cmd_rotate(&mut self, args: &[&str], out: &mut dyn Write) -> io::Result<bool> {
        let [degrees] = args else {
            writeln!(out, "usage: rotate <deg>")?;
            return Ok(false);
        };
        let rotation = match degrees.parse::<i32>().map(Rotation::try_from) {
            Ok(Ok(rotation)) => rotation,
            _ => {
                writeln!(out, "rotation must be one of 0, 90, 180, 270")?;
                return Ok(false);
            }
        };
        let Some(component) = self.selected_component() else {
            writeln!(out, "no component selected")?;
            return Ok(false);
        };
        component.rotate_by(rotation);
        let (reference, now) = (component.reference().to_string(), component.rotation);
        writeln!(out, "{} rotated to {}", reference, now)?;
        Ok(true)
    }

    fn cmd_jumper(&mut self, args: &[&str], out: &mut dyn Write) -> io::Result<()> {
        match args {
            ["add", id, net, ax, ay, bx, by] => {
                let coords: Result<Vec<i32>, _> =
                    [ax, ay, bx, by].iter().map(|v| v.parse::<i32>()).collect();
                let Ok(c) = coords else {
                    return writeln!(out, "coordinates must be integers");
                };
                let added = Jumper::new(*id, *net, Coord::new(c[0], c[1]), Coord::new(c[2], c[3]))
                    .and_then(|j| self.document.board.add_jumper(j));
                match added {
                    Ok(()) => writeln!(out, "added jumper {}", id),
                    Err(e) => writeln!(out, "error: {}", e),
                }
            }
            ["rm", id] => match self.document.board.remove_jumper(id) {
                Ok(j) => writeln!(out, "removed jumper {}", j.id),
                Err(e) => writeln!(out, "error: {}", e),
            },
            _ => writeln!(
                out,
                "usage: jumper add <id> <net> <ax> <ay> <bx> <by> | jumper rm <id>"
            ),
        }
    }

    fn cmd_check(&self, out: &mut dyn Write) -> io::Result<()> {
        let diagnostics = self.engine.run(&self.document.board);
        if diagnostics.is_empty() {
            return writeln!(out, "no problems found");
        }
        for d in &diagnostics {
            writeln!(out, "{}", d)?;
        }
        Ok(())
    }

    fn cmd_render(&mut self, args: &[&str], out: &mut dyn Write) -> io::Result<()> {
        if let [path] = args {
            self.svg_path = PathBuf::from(path);
        }
        let diagnostics = self.engine.run(&self.document.board);
        for d in &diagnostics {
            writeln!(out, "{}", d)?;
        }
        match write_svg(
            &self.svg_path,
            &self.document.board,
            &diagnostics,
            &self.render_options,
        ) {
            Ok(()) => writeln!(out, "{} updated", self.svg_path.display()),
            Err(e) => writeln!(out, "error: {}", e),
        }
    }

    fn cmd_save(&mut self, out: &mut dyn Write) -> io::Result<()> {
        match save_board(&self.board_path, &mut self.document, &mut self.colors) {
            Ok(()) => writeln!(out, "{} saved", self.board_path.display()),
            Err(e) => writeln!(out, "error: {}", e),
        }
    }

    fn selected_component(&mut self) -> Option<&mut protoboard::ComponentInstance> {
        let reference = self.selected.as_deref()?;
        self.document.board.component_mut(reference)
    }
}

/// Read commands until `quit` or end of input.
pub fn run<R: BufRead>(session: &mut Session, input: R, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Protoboard shell")?;
    writeln!(out, "Type 'help' for commands")?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            writeln!(out, "bye")?;
            return Ok(());
        };
        if session.execute(line?.trim(), out)? == Flow::Quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoboard::io::{parse_board, parse_footprints};

    const FOOTPRINTS: &str = r#"{
        "R": { "lines": [ { "start": [0, 0], "axis": "x", "count": 2, "pitch": 2 } ] }
    }"#;

    const BOARD: &str = r#"{
        "grid": { "width": 6, "height": 4 },
        "components": [
            { "ref": "R1", "footprint": "R", "x": 0, "y": 0 },
            { "ref": "R2", "footprint": "R", "x": 0, "y": 2 }
        ]
    }"#;

    fn session(dir: &std::path::Path) -> Session {
        let library = parse_footprints(FOOTPRINTS).unwrap();
        let document = parse_board(BOARD, &library).unwrap();
        Session::new(document, dir.join("board.json")).with_colors(RandomColorSource::seeded(5))
    }

    fn exec(session: &mut Session, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = session.execute(line, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_select_and_move_reports_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());

        let (_, out) = exec(&mut s, "move 1 1");
        assert_eq!(out.trim(), "no component selected");

        let (_, out) = exec(&mut s, "select R2");
        assert_eq!(out.trim(), "selected R2");

        let (_, out) = exec(&mut s, "move 0 -2");
        assert!(out.contains("R2 moved to (0, 0)"));
        assert!(out.contains("conflict at (0, 0): R2 overlaps R1"));
        assert!(out.contains("conflict at (2, 0): R2 overlaps R1"));

        let (_, out) = exec(&mut s, "list");
        assert!(out.contains("* R2 @ (0, 0)"));
    }

    #[test]
    fn test_move_past_coordinate_range_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        exec(&mut s, "select R1");

        let (flow, out) = exec(&mut s, "move 2147483647 0");
        assert_eq!(flow, Flow::Continue);
        assert!(out.starts_with("error:"), "{}", out);
        assert!(!out.contains("moved to"));

        let (_, out) = exec(&mut s, "list");
        assert!(out.contains("* R1 @ (0, 0)"));
        let (_, out) = exec(&mut s, "move 1 0");
        assert!(out.contains("R1 moved to (1, 0)"));
    }

    #[test]
    fn test_rotate_validates_degrees() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        exec(&mut s, "select R1");

        let (_, out) = exec(&mut s, "rotate 45");
        assert!(out.contains("rotation must be one of"));

        let (_, out) = exec(&mut s, "rotate 180");
        assert!(out.contains("R1 rotated to 180"));
        assert!(out.contains("R1: pin outside grid at (-2, 0)"));
    }

    #[test]
    fn test_jumper_add_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());

        let (_, out) = exec(&mut s, "jumper add J1 VCC 0 1 9 1");
        assert_eq!(out.trim(), "added jumper J1");
        let (_, out) = exec(&mut s, "check");
        assert_eq!(out.trim(), "jumper J1: endpoint b outside grid at (9, 1)");

        let (_, out) = exec(&mut s, "jumper add J1 VCC 0 1 2 1");
        assert!(out.starts_with("error:"));

        let (_, out) = exec(&mut s, "jumper add J2 VCC 1 1 1 1");
        assert!(out.starts_with("error:"));

        let (_, out) = exec(&mut s, "jumper rm J1");
        assert_eq!(out.trim(), "removed jumper J1");
        let (_, out) = exec(&mut s, "check");
        assert_eq!(out.trim(), "no problems found");
    }

    #[test]
    fn test_save_and_render_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        exec(&mut s, "jumper add J1 GND 1 1 5 1");

        let (_, out) = exec(&mut s, "save");
        assert!(out.contains("saved"));
        let saved = std::fs::read_to_string(dir.path().join("board.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert!(value["jumpers"][0]["color"].as_str().unwrap().starts_with('#'));

        let svg = dir.path().join("out.svg");
        let (_, out) = exec(&mut s, &format!("render {}", svg.display()));
        assert!(out.contains("updated"));
        assert!(std::fs::read_to_string(&svg).unwrap().starts_with("<svg"));
    }

    #[test]
    fn test_run_until_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        let input = b"help\nbogus\nquit\nlist\n";
        let mut out = Vec::new();
        run(&mut s, &input[..], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Commands:"));
        assert!(text.contains("unknown command 'bogus'"));
        assert!(text.trim_end().ends_with("bye"));
        assert!(!text.contains("R1 @"));
    }
}
