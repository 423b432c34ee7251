mod prefabs;
mod test_scene;

pub use prefabs::{
    manifest_avatar, standard_template, AvatarKind, AvatarRoster, AvatarTemplate, BarrageTemplate,
    BlastTemplate,
};
pub use test_scene::{demo_script, ScriptEvent};
