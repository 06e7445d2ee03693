// Knight sprite-sheet animation

use std::collections::HashMap;

/// Every sprite sheet the knight can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationId {
    Idle,
    Run,
    Jump,
    Fall,
    Roll,
    Slide,
    SlideEnd,
    Wallslide,
    Dash,
    CrouchIdle,
    CrouchWalk,
    CrouchTransition,
    CrouchAttack,
    FirstAttack,
    SecondAttack,
    Hurt,
    Die,
}

impl AnimationId {
    pub const ALL: [AnimationId; 17] = [
        Self::Idle,
        Self::Run,
        Self::Jump,
        Self::Fall,
        Self::Roll,
        Self::Slide,
        Self::SlideEnd,
        Self::Wallslide,
        Self::Dash,
        Self::CrouchIdle,
        Self::CrouchWalk,
        Self::CrouchTransition,
        Self::CrouchAttack,
        Self::FirstAttack,
        Self::SecondAttack,
        Self::Hurt,
        Self::Die,
    ];

    /// Sheet name as authored in the sprite atlas
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Fall => "fall",
            Self::Roll => "roll",
            Self::Slide => "slide",
            Self::SlideEnd => "slide_end",
            Self::Wallslide => "wallslide",
            Self::Dash => "dash",
            Self::CrouchIdle => "crouch_idle",
            Self::CrouchWalk => "crouch_walk",
            Self::CrouchTransition => "crouch_transition",
            Self::CrouchAttack => "crouch_attack",
            Self::FirstAttack => "first_attack",
            Self::SecondAttack => "second_attack",
            Self::Hurt => "hurt",
            Self::Die => "die",
        }
    }
}

/// Playback side of the knight's sprite.
///
/// The controller decides when a sheet switch is redundant; implementations
/// restart the sheet on every `set_sheet` call.
pub trait SheetAnimator {
    fn set_sheet(&mut self, id: AnimationId);

    /// Sprite opacity in [0, 1]
    fn set_alpha(&mut self, alpha: f32);

    fn set_flip_horizontal(&mut self, flip: bool);

    /// Advance playback by one frame tick
    fn advance(&mut self, _dt: f32) {}
}

/// A single animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub id: AnimationId,
    /// Number of frames in the animation
    pub frame_count: usize,
    /// Duration of each frame in seconds
    pub frame_duration: f32,
    pub looping: bool,
    /// Frame index where the loop restarts (if looping)
    pub loop_start: usize,
}

impl AnimationClip {
    pub fn new(id: AnimationId, frame_count: usize, fps: f32, looping: bool) -> Self {
        Self {
            id,
            frame_count,
            frame_duration: 1.0 / fps,
            looping,
            loop_start: 0,
        }
    }

    pub fn looping(id: AnimationId, frame_count: usize, fps: f32) -> Self {
        Self::new(id, frame_count, fps, true)
    }

    /// Plays once and holds the last frame
    pub fn one_shot(id: AnimationId, frame_count: usize, fps: f32) -> Self {
        Self::new(id, frame_count, fps, false)
    }

    /// Set the frame where looping restarts
    pub fn with_loop_start(mut self, frame: usize) -> Self {
        self.loop_start = frame.min(self.frame_count.saturating_sub(1));
        self
    }

    /// Length of one cycle in seconds
    pub fn total_duration(&self) -> f32 {
        self.frame_count as f32 * self.frame_duration
    }
}

/// Frame-based playback of the knight's sheets
#[derive(Debug)]
pub struct AnimationPlayer {
    animations: HashMap<AnimationId, AnimationClip>,
    current: Option<AnimationId>,
    current_frame: usize,
    frame_timer: f32,
    playing: bool,
    playback_speed: f32,
    flip_horizontal: bool,
    alpha: f32,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self {
            animations: HashMap::new(),
            current: None,
            current_frame: 0,
            frame_timer: 0.0,
            playing: false,
            playback_speed: 1.0,
            flip_horizontal: false,
            alpha: 1.0,
        }
    }

    /// Player loaded with the knight's sheet layout
    pub fn with_knight_animations() -> Self {
        use AnimationId::*;

        let mut player = Self::new();
        player.add_animation(AnimationClip::looping(Idle, 8, 10.0));
        player.add_animation(AnimationClip::looping(Run, 10, 14.0));
        player.add_animation(AnimationClip::looping(Jump, 3, 10.0).with_loop_start(2));
        player.add_animation(AnimationClip::looping(Fall, 3, 10.0).with_loop_start(2));
        player.add_animation(AnimationClip::one_shot(Roll, 12, 30.0));
        player.add_animation(AnimationClip::looping(Slide, 2, 12.0));
        player.add_animation(AnimationClip::one_shot(SlideEnd, 2, 12.0));
        player.add_animation(AnimationClip::looping(Wallslide, 3, 10.0));
        player.add_animation(AnimationClip::one_shot(Dash, 2, 15.0));
        player.add_animation(AnimationClip::looping(CrouchIdle, 1, 10.0));
        player.add_animation(AnimationClip::looping(CrouchWalk, 8, 12.0));
        player.add_animation(AnimationClip::one_shot(CrouchTransition, 1, 10.0));
        player.add_animation(AnimationClip::one_shot(CrouchAttack, 4, 12.0));
        player.add_animation(AnimationClip::one_shot(FirstAttack, 4, 12.0));
        player.add_animation(AnimationClip::one_shot(SecondAttack, 6, 14.0));
        player.add_animation(AnimationClip::one_shot(Hurt, 1, 10.0));
        player.add_animation(AnimationClip::one_shot(Die, 10, 12.0));
        player.play(Idle);
        player
    }

    pub fn add_animation(&mut self, clip: AnimationClip) {
        self.animations.insert(clip.id, clip);
    }

    /// Switch to a sheet; does nothing if it is already current
    pub fn play(&mut self, id: AnimationId) {
        if self.current != Some(id) {
            self.play_from_start(id);
        }
    }

    /// Play a sheet from its first frame, even if it is already current
    pub fn play_from_start(&mut self, id: AnimationId) {
        self.current = Some(id);
        self.current_frame = 0;
        self.frame_timer = 0.0;
        self.playing = true;
    }

    /// Set playback speed (1.0 = normal, 2.0 = double speed)
    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed.max(0.0);
    }

    pub fn is_flipped_horizontal(&self) -> bool {
        self.flip_horizontal
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(clip) = self.current.and_then(|id| self.animations.get(&id)) else {
            return;
        };

        self.frame_timer += dt * self.playback_speed;

        while self.frame_timer >= clip.frame_duration {
            self.frame_timer -= clip.frame_duration;
            self.current_frame += 1;

            if self.current_frame >= clip.frame_count {
                if clip.looping {
                    self.current_frame = clip.loop_start;
                } else {
                    self.current_frame = clip.frame_count - 1;
                    self.playing = false;
                    break;
                }
            }
        }
    }

    pub fn current_animation(&self) -> Option<AnimationId> {
        self.current
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether a one-shot sheet reached its last frame
    pub fn is_finished(&self) -> bool {
        match self.current_clip() {
            Some(clip) => !clip.looping && self.current_frame + 1 >= clip.frame_count && !self.playing,
            None => true,
        }
    }

    /// What a renderer needs to draw the current frame
    pub fn frame_data(&self) -> Option<AnimationFrameData> {
        let clip = self.current_clip()?;
        Some(AnimationFrameData {
            animation: clip.id,
            frame_index: self.current_frame.min(clip.frame_count.saturating_sub(1)),
            flip_horizontal: self.flip_horizontal,
            alpha: self.alpha,
        })
    }

    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.current.and_then(|id| self.animations.get(&id))
    }
}

impl SheetAnimator for AnimationPlayer {
    fn set_sheet(&mut self, id: AnimationId) {
        if !self.animations.contains_key(&id) {
            log::warn!("No clip for animation '{}'", id.name());
        }
        self.play_from_start(id);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    fn advance(&mut self, dt: f32) {
        self.update(dt);
    }
}

/// Data needed to render the current animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrameData {
    pub animation: AnimationId,
    pub frame_index: usize,
    pub flip_horizontal: bool,
    pub alpha: f32,
}
