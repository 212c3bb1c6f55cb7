//! Renders the pattern store as an AVR `PROGMEM` header (`patterns.h`).

use crate::geometry::PanelId;
use crate::pattern::PatternStore;

pub const FILE_NAME: &str = "patterns.h";

const HEADER: &str = "#include <avr/pgmspace.h>\n#define PCOUNT 1\n\n";
const ROW_INDENT: &str = "         ";

// Pointer tables, in the order the firmware declares them.
const POINTER_ORDER: [(PanelId, &str); 4] = [
    (PanelId::LeftTail, "leftTailBitmaps"),
    (PanelId::RightTail, "rightTailBitmaps"),
    (PanelId::LeftWing, "leftWingBitmaps"),
    (PanelId::RightWing, "rightWingBitmaps"),
];

/// Pure function of the store: identical cells give byte-identical text.
pub fn render(store: &PatternStore) -> String {
    let mut code = String::from(HEADER);

    for (id, pattern) in store.iter() {
        let total = pattern.cells().len();
        code.push_str(&format!(
            "const unsigned short\n    {}1[{total}] PROGMEM =\n        {{\n",
            id.symbol()
        ));
        for row in pattern.rows() {
            code.push_str(ROW_INDENT);
            let literals: Vec<String> = row.iter().map(ToString::to_string).collect();
            code.push_str(&literals.join(", "));
            code.push_str(",\n");
        }
        code.push_str("};\n\n");
    }

    for (id, table) in POINTER_ORDER {
        code.push_str(&format!("const unsigned short *{table}[] = {{{}1}};\n", id.symbol()));
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::LedColor;
    use crate::geometry::{Panel, Panels};

    fn tiny_panels() -> Panels {
        Panels::new([
            Panel::new(2, 1, 0, 0),
            Panel::new(1, 2, 0, 0),
            Panel::new(1, 1, 0, 0),
            Panel::new(1, 1, 0, 0),
        ])
    }

    #[test]
    fn renders_exact_layout() {
        let mut store = PatternStore::new(&tiny_panels());
        store.paint_cell(PanelId::LeftWing, 0, 1, LedColor::from_nibbles(15, 0, 0));
        store.paint_cell(PanelId::RightWing, 1, 0, LedColor::from_nibbles(0, 10, 3));

        let expected = "#include <avr/pgmspace.h>\n#define PCOUNT 1\n\n\
const unsigned short\n    leftwing1[2] PROGMEM =\n        {\n         0xFFF, 0xF00,\n};\n\n\
const unsigned short\n    rightwing1[2] PROGMEM =\n        {\n         0xFFF,\n         0x0A3,\n};\n\n\
const unsigned short\n    lefttail1[1] PROGMEM =\n        {\n         0xFFF,\n};\n\n\
const unsigned short\n    righttail1[1] PROGMEM =\n        {\n         0xFFF,\n};\n\n\
const unsigned short *leftTailBitmaps[] = {lefttail1};\n\
const unsigned short *rightTailBitmaps[] = {righttail1};\n\
const unsigned short *leftWingBitmaps[] = {leftwing1};\n\
const unsigned short *rightWingBitmaps[] = {rightwing1};\n";
        assert_eq!(render(&store), expected);
    }

    #[test]
    fn default_sizes_in_declarations() {
        let text = render(&PatternStore::new(&Panels::default()));
        assert!(text.contains("leftwing1[232] PROGMEM"));
        assert!(text.contains("righttail1[36] PROGMEM"));
    }
}
