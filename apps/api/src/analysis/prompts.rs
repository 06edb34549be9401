// Skill extraction prompt templates.

pub const SKILL_EXTRACTION_SYSTEM: &str = "\
You are an AI expert at extracting comprehensive skill requirements from job descriptions. \
Extract EVERY skill mentioned. \
You MUST respond with valid JSON only. No markdown fences, no explanations.";

pub const SKILL_EXTRACTION_PROMPT: &str = r#"You are an expert HR recruitment assistant. Carefully analyze the following Job Description and extract EVERY skill, technology, tool, qualification, and competency mentioned.

Return a JSON object with exactly these keys:

1. "all_skills": a comprehensive list of ALL skills in the JD: technical skills, functional skills, software and tools, methodologies (Agile, Scrum, Six Sigma), certifications, domain knowledge areas, soft skills. Extract 15-30 skills.

2. "skill_categories": the same skills organized by category, e.g.
   {"Technical": [...], "Tools": [...], "Soft Skills": [...], "Domain Knowledge": [...], "Certifications": [...]}

3. "role_category": the most suitable role category (HR, Marketing, IT, Finance, Sales, Operations, ...)

4. "experience_level": one of "Entry Level", "Mid Level", "Senior Level", "Executive Level"

5. "key_responsibilities": the 5-7 main responsibilities in the JD

6. "qualifications": educational requirements and certifications, as a list of strings

7. "linkedin_optimized_skills": the 10 skills most useful as LinkedIn search terms

{domain_context}

JD:
{jd_text}"#;
