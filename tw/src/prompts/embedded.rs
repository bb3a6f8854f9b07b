//! Embedded prompt templates
//!
//! System prompts are plain constants; user prompts are Handlebars templates
//! rendered with a per-stage context built from the travel state.

/// System prompt for the itinerary planning stage
pub const ITINERARY_SYSTEM: &str = r#"You are an expert travel itinerary planner. Create a detailed day-by-day itinerary that:
1. Balances activities with rest time
2. Groups nearby attractions logically
3. Considers travel time between locations
4. Matches the traveler's interests and preferences
5. Includes specific timing suggestions
6. Accounts for meal times and local dining options"#;

/// User prompt template for the itinerary planning stage
pub const ITINERARY_USER: &str = r#"Create a day-by-day itinerary for:
- Destination: {{destination}}
- Dates: {{start_date}} to {{end_date}} ({{trip_days}} days)
- Traveler interests: {{hobbies}}
- Preferences: {{preferences}}
{{#if saved_preferences}}
Previously saved traveler profile:
{{saved_preferences}}
{{/if}}
Destination information:
{{destination_info}}

Provide a detailed daily schedule."#;

/// System prompt for the accommodation stage
pub const ACCOMMODATIONS_SYSTEM: &str = r#"You are a hotel and accommodation specialist. Suggest accommodations that:
1. Match the traveler's budget and preferences
2. Are well-located for the planned itinerary
3. Have good reviews and ratings
4. Offer relevant amenities
5. Consider different accommodation types (hotels, hostels, vacation rentals, etc.)"#;

/// User prompt template for the accommodation stage
pub const ACCOMMODATIONS_USER: &str = r#"Suggest accommodations in {{destination}} for:
- Dates: {{start_date}} to {{end_date}}
- Preferences: {{preferences}}
- Itinerary focus areas: See the itinerary below

Destination information:
{{destination_info}}

Itinerary:
{{itinerary}}

Provide 3-5 accommodation recommendations with pros and cons."#;

/// System prompt for the activity stage
pub const ACTIVITIES_SYSTEM: &str = r#"You are an activity and experience curator. Recommend activities that:
1. Align with the traveler's hobbies and interests
2. Are unique to the destination
3. Fit within the itinerary timeframe
4. Offer a mix of popular and off-beaten-path experiences
5. Include booking information and tips"#;

/// User prompt template for the activity stage
pub const ACTIVITIES_USER: &str = r#"Recommend activities in {{destination}} for someone interested in: {{hobbies}}
- Travel dates: {{start_date}} to {{end_date}}
- Preferences: {{preferences}}

Destination information:
{{destination_info}}

Existing itinerary:
{{itinerary}}

Suggest specific activities, tours, or experiences they shouldn't miss."#;

/// System prompt for the final compilation stage
pub const COMPILE_SYSTEM: &str = r#"You are a travel plan compiler. Create a comprehensive, well-organized travel plan that:
1. Combines all research, itinerary, accommodations, and activities
2. Presents information in a clear, easy-to-follow format
3. Includes practical tips and reminders
4. Adds any final recommendations
5. Formats the plan beautifully with sections and subsections

Target length: 3000-5000 words. Write one cohesive document."#;

/// User prompt template for the final compilation stage
pub const COMPILE_USER: &str = r#"Compile a final comprehensive travel plan using all the information below:

DESTINATION RESEARCH:
{{destination_info}}

DAILY ITINERARY:
{{itinerary}}

ACCOMMODATIONS:
{{accommodations}}

RECOMMENDED ACTIVITIES:
{{activities}}

Create a polished, complete travel guide for a trip from {{source}} to {{destination}}
from {{start_date}} to {{end_date}}."#;
