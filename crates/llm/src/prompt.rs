//! Prompt templates.

use scan2cad_core::dimensions::Dimensions;

/// Designer prompt asking the model for an OpenJSCAD accessory that fits
/// an object of `dimensions`.
pub fn jscad_prompt(user_prompt: &str, dimensions: &Dimensions) -> String {
    format!(
        "
You are a CAD designer that generates OpenJSCAD code to create accessories for 3D scanned objects.

The user has scanned an object with these dimensions:
- Width: {width} mm
- Height: {height} mm
- Depth: {depth} mm

The user wants: {user_prompt}

Your task:
1. Generate clean, valid OpenJSCAD code that creates a parametric design
2. The design should fit the dimensions of the scanned object
3. Create a main() function that returns the final CSG object
4. Use proper parameters for customization

Only respond with the OpenJSCAD code and no other text.
",
        width = dimensions.width,
        height = dimensions.height,
        depth = dimensions.depth,
    )
}

/// Question put to the vision-language model alongside a photo.
pub const DIMENSION_QUESTION: &str = "Estimate the physical size of the main object in this photo. \
Answer as: width <number> mm, height <number> mm, depth <number> mm.";
