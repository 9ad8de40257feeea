//! Prompt rendering for the three generation stages.
//!
//! All renderers are pure functions of their inputs; nothing here holds
//! state. The wording encodes the contracts the downstream passes rely
//! on (JSON outline shape, pandoc slide markup, diagram fence rules).

/// Expected JSON shape of the outline response.
const OUTLINE_FORMAT: &str = r#"Return only the JSON object with the following sample structure:
{
  "title": "Title of the presentation",
  "slides": [
    {
      "heading": "Slide title",
      "key_message": "Key message of the slide"
    },
    ...
  ]
}
"#;

/// System prompt for outline generation.
pub fn structure_system_prompt() -> String {
    format!(
        r#"You are an expert presentation designer creating logical slide outlines.

Task: Generate a coherent slide structure (titles only, no content) based on the user prompt and reference document.

Requirements:
- Always include Introduction and Summary slides
- Extract key sections from the markdown content
- Ensure logical flow and alignment with the user prompt
- Output only slide titles in JSON format

Output format:
{OUTLINE_FORMAT}"#
    )
}

/// User prompt for outline generation.
pub fn structure_user_prompt(user_prompt: &str, reference: &str, num_slides: usize) -> String {
    format!(
        r#"{user_prompt}.

Reference markdown content:
```markdown
{reference}
```

Only generate {num_slides} slides.
Please generate the slide outline in the JSON format described above.
"#
    )
}

/// Markdown formatting rules for pandoc slide conversion.
const CONTENT_FORMAT: &str = r#"The output must be a markdown document structured for Pandoc conversion to PowerPoint.
Follow these formatting rules:

- Use `#` for the presentation title (this maps to the Title Slide layout).
- Use `##` for each new slide title (this maps to the Title and Content layout).
- Use `---` to separate slides, with a newline above and below it.
- Include speaker notes using the following syntax:
::: notes
This is my note.
- It can contain Markdown
- like this list
:::

- Use standard markdown syntax for tables.
- Use fenced code blocks for code: a row of three backticks before and after the code, separated from surrounding text by blank lines.
- Slides with only speaker notes or blank content map to the Blank layout.
"#;

/// System prompt for content generation.
pub fn content_system_prompt() -> String {
    format!(
        r#"You are an expert at creating concise, visual slide content.

Task: Generate detailed slide content using the provided structure and reference material.

Content Guidelines:
- Maximum 5 bullet points per slide, each conveying a key idea
- Use tables for comparisons of multiple items
- Focus on key information, avoid dense text
- Extract relevant sections from reference material
- Ensure a visual, scannable format

Output format:
{CONTENT_FORMAT}"#
    )
}

/// User prompt for content generation.
pub fn content_user_prompt(outline: &str, reference: &str) -> String {
    format!(
        r#"Use the provided slide structure as your guide and extract relevant key information from the reference content to create detailed slides.

Slide structure to follow:
{outline}

Reference markdown content:
```markdown
{reference}
```
Please generate the presentation in the markdown format described above.
The markdown should be clean and ready for conversion into a PowerPoint presentation using Pandoc.
"#
    )
}

/// Worked examples of valid diagram blocks.
const DIAGRAM_EXAMPLES: &str = r#"- Sequence diagram:

```mermaid
sequenceDiagram
    Alice->>John: Hello John, how are you?
    John-->>Alice: Great!
    Alice-)John: See you later!
```

- Flow chart:

```mermaid
flowchart LR
    Logger["LogManager"] --> TaskA["logger.get_logger('data_preprocessing')"]
    Logger --> TaskB["logger.get_logger('model_training')"]
    TaskA -->|writes| FileA["preprocess.log"]
    TaskB -->|writes| FileB["training.log"]
```

Possible flowchart orientations are:
TB: top to bottom, TD: top-down, BT: bottom to top, RL: right to left, LR: left to right.

- Class diagram:

```mermaid
classDiagram
    Animal <|-- Duck
    Animal <|-- Fish
    Animal : +int age
    Animal : +isMammal()
    class Duck{
        +String beakColor
        +swim()
    }
```

- Pie chart:

```mermaid
pie showData
    title Key elements in Product X
    "Calcium" : 42.96
    "Potassium" : 50.05
    "Iron" : 5
```

- Timeline:

```mermaid
timeline
    title History of Social Media Platform
    2002 : LinkedIn
    2004 : Facebook
        : Google
    2005 : YouTube
```
"#;

/// System prompt for diagram insertion.
pub fn diagram_generation_system_prompt() -> String {
    format!(
        r#"You are a specialized agent that enhances Markdown documents by inserting syntactically correct Mermaid diagrams.

Core Responsibilities:
- Insert Mermaid diagrams ONLY in appropriate locations within speaker notes sections
- Do NOT modify any existing Markdown content
- Ensure all Mermaid syntax is valid and renderable
- Limit to one diagram per slide unless explicitly needed
- Skip diagram insertion if content is already clear without visual aid

Mermaid Code Block Rules:
- Opening: ```mermaid (exactly three backticks + "mermaid")
- Closing: ``` (exactly three backticks only)
- NO nested or duplicate backticks within diagram content
- Newlines before and after the entire code block

Syntax Requirements:
- Use --> for arrows (NOT -- > or other variations)
- Node IDs: alphanumeric only, no spaces
- Labels: use A["Label"] or A[Label] format consistently
- Flowcharts must start with "flowchart" plus an orientation (LR, TD, etc.)

Diagram Selection Guidelines:
- Process flows: flowchart
- System interactions: sequence diagram
- Data structures: class diagram
- Timeline data: timeline diagram
- Statistics: pie chart

Few-shot examples:
{DIAGRAM_EXAMPLES}"#
    )
}

/// User prompt for diagram insertion.
pub fn diagram_generation_user_prompt(content: &str) -> String {
    format!(
        r#"Analyze this Markdown document and insert Mermaid diagrams ONLY where they provide significant visual value.

Rules:
- Insert diagrams within speaker notes sections only
- One diagram per slide maximum, unless multiple are clearly needed
- Ensure syntactically correct Mermaid code
- Do not modify existing content

Markdown content:
{content}
"#
    )
}

/// System prompt for the diagram validation/repair pass.
pub fn diagram_validation_system_prompt() -> String {
    r#"You are a specialized agent responsible for validating and correcting Mermaid diagrams embedded in Markdown documents.
Your responsibilities are:

1. Scope of Modification
- Do not modify any non-Mermaid content in the Markdown.
- Only process Mermaid code blocks that contain syntax errors or invalid structures.
- Do not insert new diagrams, only fix existing ones.

2. Code Block Structure Validation
- Ensure each Mermaid diagram is properly enclosed: ```mermaid at start, ``` at end
- Verify there are no duplicate or nested backticks within the diagram content
- Ensure proper newlines before and after code blocks

3. Syntax Validation and Common Fixes
- Replace invalid arrow syntax: use --> instead of -- >
- Fix node labeling: labels with spaces, parentheses, HTML tags, or special characters must be quoted
- Correct relationship syntax in class diagrams
- Validate diagram type declarations and their orientations

4. Output Requirement
- Always return the entire markdown document, including both modified and unmodified content, even if no changes are made.
- Never summarize, omit, or skip any sections. Output only the full markdown document, with no explanations or comments.
"#
    .to_string()
}

/// User prompt for the diagram validation/repair pass.
pub fn diagram_validation_user_prompt(content: &str) -> String {
    format!(
        r#"Please validate and fix the Mermaid diagrams in the following Markdown document.

Focus on these common issues:
1. Duplicate or malformed ``` lines
2. Invalid arrow syntax (-- > should be -->)
3. Unquoted node labels with special characters
4. Invalid diagram type declarations
5. Syntax errors that prevent rendering

- Only fix Mermaid code blocks with errors.
- Do not modify any non-Mermaid content.
- Return the entire markdown document, even if no changes are needed.

Markdown document to validate:
{content}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_prompts_embed_inputs() {
        let system = structure_system_prompt();
        assert!(system.contains("JSON"));
        assert!(system.contains("key_message"));

        let user = structure_user_prompt("Explain queues", "# Queues", 12);
        assert!(user.contains("Explain queues"));
        assert!(user.contains("# Queues"));
        assert!(user.contains("Only generate 12 slides"));
    }

    #[test]
    fn test_content_prompts_embed_inputs() {
        let system = content_system_prompt();
        assert!(system.contains("::: notes"));
        assert!(system.contains("---"));

        let user = content_user_prompt("{\"title\": \"Deck\"}", "# Ref");
        assert!(user.contains("{\"title\": \"Deck\"}"));
        assert!(user.contains("# Ref"));
    }

    #[test]
    fn test_diagram_prompts_state_fence_rules() {
        let system = diagram_generation_system_prompt();
        assert!(system.contains("```mermaid"));
        assert!(system.contains("sequenceDiagram"));

        let user = diagram_generation_user_prompt("## Slide");
        assert!(user.contains("## Slide"));
    }

    #[test]
    fn test_validation_prompts_demand_full_document() {
        let system = diagram_validation_system_prompt();
        assert!(system.contains("entire markdown document"));

        let user = diagram_validation_user_prompt("body");
        assert!(user.contains("body"));
        assert!(user.contains("Duplicate or malformed"));
    }
}
