//! Parametric JSCAD template for a protective case.

use scan2cad_core::dimensions::Dimensions;

/// Wall thickness of generated cases, in millimetres.
pub const WALL_MM: f64 = 3.0;

/// JSCAD source for a box with a cavity sized to `dimensions`.
///
/// The cavity is shifted up by half a wall so the case keeps a floor.
pub fn case_source(dimensions: &Dimensions) -> String {
    format!(
        r#"// OpenJSCAD source for generated model
function main() {{
  const dimensions = {{
    width: {width},
    height: {height},
    depth: {depth}
  }};

  // Create a parametric design based on scanned object
  const case = createCase(dimensions);

  return case;
}}

// Create a case that wraps around the object with a small offset
function createCase(dimensions) {{
  const offset = {wall}; // wall thickness in mm

  return CSG.cube({{
    center: [0, 0, 0],
    radius: [
      dimensions.width/2 + offset,
      dimensions.height/2 + offset,
      dimensions.depth/2 + offset
    ]
  }}).subtract(
    CSG.cube({{
      center: [0, 0, offset/2],
      radius: [
        dimensions.width/2,
        dimensions.height/2,
        dimensions.depth/2
      ]
    }})
  );
}}
"#,
        width = dimensions.width,
        height = dimensions.height,
        depth = dimensions.depth,
        wall = WALL_MM,
    )
}
