//! Integration tests for the frame pipeline
//!
//! Drives full frames through `FrameLoop` with the recording fakes and checks
//! command order, cache reuse and deferred-task timing.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::{Mat4, Vec3};

    use crate::command::{CommandQueue, CommandSink, ModeChange, ModelHandle};
    use crate::config::Config;
    use crate::console::DEPTH_FAR;
    use crate::coprocessor::Coprocessor;
    use crate::deferred::DeferredTask;
    use crate::frame::FrameLoop;
    use crate::input::{Buttons, InputFrame};
    use crate::test_utils::{
        CITY, FixedStepClock, RecordingRasterizer, SKY, ScriptedInput, TERRAIN, TestAssets, TestAtmosphere,
        TraceEvent,
    };
    use crate::transform::{DeviceMemory, FixedMat4, Srt};

    type TestLoop = FrameLoop<RecordingRasterizer, TestAtmosphere, ScriptedInput, FixedStepClock>;

    fn frame_loop(rasterizer: RecordingRasterizer, input: ScriptedInput) -> TestLoop {
        let mut assets = TestAssets::default();
        FrameLoop::new(
            &Config::default(),
            rasterizer,
            TestAtmosphere::default(),
            input,
            FixedStepClock::new(1.0 / 60.0),
            &mut assets,
        )
        .unwrap()
    }

    fn drawn_models(trace: &[TraceEvent]) -> Vec<ModelHandle> {
        trace
            .iter()
            .filter_map(|event| match event {
                TraceEvent::DrawModel(model, _) => Some(*model),
                _ => None,
            })
            .collect()
    }

    // ============================================================================
    // Draw order
    // ============================================================================

    #[test]
    fn test_frame_draw_order() {
        let mut frame_loop = frame_loop(RecordingRasterizer::default(), ScriptedInput::default());
        frame_loop.tick().unwrap();

        let trace = &frame_loop.rasterizer().frames[0];
        assert_eq!(trace.first(), Some(&TraceEvent::FrameStart));
        assert_eq!(trace[1], TraceEvent::ClearDepth);
        assert_eq!(trace.last(), Some(&TraceEvent::Present));
        assert_eq!(drawn_models(trace), vec![SKY, TERRAIN, CITY]);

        let position = |wanted: &TraceEvent| trace.iter().position(|e| e == wanted).unwrap();
        let multiply = position(&TraceEvent::SetMode(ModeChange::Blender(crate::command::Blender::Multiply)));
        let quad = trace
            .iter()
            .position(|e| matches!(e, TraceEvent::DrawQuad(_)))
            .unwrap();
        let sample = trace
            .iter()
            .position(|e| matches!(e, TraceEvent::DepthSample(..)))
            .unwrap();
        assert!(multiply < quad);
        assert!(quad < sample);
        assert_eq!(sample, trace.len() - 2);
    }

    #[test]
    fn test_sky_is_drawn_under_the_camera_transform() {
        let mut frame_loop = frame_loop(RecordingRasterizer::default(), ScriptedInput::default());
        frame_loop.tick().unwrap();

        let trace = &frame_loop.rasterizer().frames[0];
        let expected = FixedMat4::from_mat4(&Srt::uniform(0.2, frame_loop.camera().position()).to_mat4());
        let sky_transform = trace
            .iter()
            .find_map(|event| match event {
                TraceEvent::DrawModel(model, transform) if *model == SKY => Some(*transform),
                _ => None,
            })
            .unwrap();
        assert_eq!(sky_transform, expected);

        let terrain_transform = trace
            .iter()
            .find_map(|event| match event {
                TraceEvent::DrawModel(model, transform) if *model == TERRAIN => Some(*transform),
                _ => None,
            })
            .unwrap();
        assert_eq!(terrain_transform, FixedMat4::IDENTITY);
        assert_eq!(frame_loop.coprocessor().stack().depth(), 0);
    }

    #[test]
    fn test_sky_follows_moving_camera() {
        let input = ScriptedInput::new([InputFrame::holding(Buttons::L)]);
        let mut frame_loop = frame_loop(RecordingRasterizer::default(), input);
        frame_loop.tick().unwrap();

        let position = frame_loop.camera().position();
        assert!(position.abs_diff_eq(Vec3::new(0.0, 155.25, 90.0), 1e-4));
        let trace = &frame_loop.rasterizer().frames[0];
        let TraceEvent::DrawModel(_, transform) = trace
            .iter()
            .find(|e| matches!(e, TraceEvent::DrawModel(model, _) if *model == SKY))
            .unwrap()
        else {
            unreachable!()
        };
        assert!(
            transform
                .to_mat4()
                .abs_diff_eq(Mat4::from_scale_rotation_translation(Vec3::splat(0.2), Default::default(), position), 1e-3)
        );
    }

    // ============================================================================
    // Static geometry cache
    // ============================================================================

    #[test]
    fn test_cache_records_once_and_frames_are_identical() {
        let mut frame_loop = frame_loop(RecordingRasterizer::default(), ScriptedInput::default());
        frame_loop.run(Some(1000)).unwrap();

        assert_eq!(frame_loop.scene().geometry().build_count(), 1);
        assert_eq!(frame_loop.coprocessor().stats().block_replays, 1000);

        let frames = &frame_loop.rasterizer().frames;
        assert_eq!(frames.len(), 1000);
        let first = bincode::serialize(&frames[0]).unwrap();
        for (index, frame) in frames.iter().enumerate().skip(1) {
            assert_eq!(bincode::serialize(frame).unwrap(), first, "frame {index}");
        }
    }

    #[test]
    fn test_building_twice_does_not_duplicate_draws() {
        let mut frame_loop = frame_loop(RecordingRasterizer::default(), ScriptedInput::default());
        let first = frame_loop.scene().geometry().build().unwrap();
        let second = frame_loop.scene().geometry().build().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        frame_loop.tick().unwrap();
        let trace = &frame_loop.rasterizer().frames[0];
        assert_eq!(drawn_models(trace), vec![SKY, TERRAIN, CITY]);
        assert_eq!(frame_loop.scene().geometry().build_count(), 1);
    }

    #[test]
    fn test_replay_observes_modes_set_before_it() {
        let mut frame_loop = frame_loop(RecordingRasterizer::default(), ScriptedInput::default());
        frame_loop.tick().unwrap();

        let trace = &frame_loop.rasterizer().frames[0];
        let tex_shade = trace
            .iter()
            .position(|e| *e == TraceEvent::SetMode(ModeChange::Combiner(crate::command::Combiner::TexShade)))
            .unwrap();
        let terrain = trace
            .iter()
            .position(|e| matches!(e, TraceEvent::DrawModel(model, _) if *model == TERRAIN))
            .unwrap();
        assert!(tex_shade < terrain);
        // No combiner change between the opaque setup and the replayed draws
        assert!(
            !trace[tex_shade + 1..terrain]
                .iter()
                .any(|e| matches!(e, TraceEvent::SetMode(ModeChange::Combiner(_))))
        );
    }

    // ============================================================================
    // Deferred post-effects
    // ============================================================================

    #[test]
    fn test_deferred_task_sees_this_frames_occluder() {
        let rasterizer = RecordingRasterizer::with_occluder(TERRAIN, 1200);
        let mut frame_loop = frame_loop(rasterizer, ScriptedInput::default());
        let samples = frame_loop.atmosphere().samples.clone();

        frame_loop.tick().unwrap();
        assert_eq!(samples.borrow().as_slice(), &[Some(1200)]);

        // Next frame's occluder must not leak into the sample already taken,
        // and this frame's clear must hide the previous one
        frame_loop.rasterizer_mut().occluders.insert(TERRAIN, 300);
        frame_loop.tick().unwrap();
        frame_loop.rasterizer_mut().occluders.clear();
        frame_loop.tick().unwrap();
        assert_eq!(samples.borrow().as_slice(), &[Some(1200), Some(300), Some(DEPTH_FAR)]);
        assert_eq!(frame_loop.coprocessor().stats().deferred_run, 3);
    }

    #[test]
    fn test_deferred_task_runs_after_earlier_draws_before_present() {
        let mut memory = DeviceMemory::new();
        let slot = memory.alloc(&Mat4::IDENTITY);
        let mut rasterizer = RecordingRasterizer::with_occluder(ModelHandle(7), 42);
        let mut coprocessor = Coprocessor::new();
        let mut queue = CommandQueue::new();
        let seen = std::rc::Rc::new(std::cell::Cell::new(None));

        crate::console::Rasterizer::attach(&mut rasterizer).unwrap();
        coprocessor.frame_start(&mut rasterizer);
        queue.clear_depth();
        queue.set_mode(ModeChange::Depth {
            compare: true,
            update: true,
        });
        queue.push_matrix(slot);
        queue.draw_model(ModelHandle(7));
        queue.pop_matrix(1);
        let sink = seen.clone();
        queue.call_deferred(DeferredTask::new("probe", move |depth| sink.set(depth.sample_depth(0, 0))));
        coprocessor.present(&mut queue, &memory, &mut rasterizer).unwrap();

        assert_eq!(seen.get(), Some(42));
        let trace = &rasterizer.frames[0];
        assert_eq!(trace[trace.len() - 2], TraceEvent::DepthSample(0, 0));
        assert_eq!(trace[trace.len() - 1], TraceEvent::Present);
    }

    #[test]
    fn test_present_without_deferred_task_is_unchanged() {
        let memory = DeviceMemory::new();
        let mut rasterizer = RecordingRasterizer::default();
        let mut coprocessor = Coprocessor::new();
        let mut queue = CommandQueue::new();

        crate::console::Rasterizer::attach(&mut rasterizer).unwrap();
        coprocessor.frame_start(&mut rasterizer);
        queue.clear_depth();
        coprocessor.present(&mut queue, &memory, &mut rasterizer).unwrap();

        assert_eq!(
            rasterizer.frames[0],
            vec![TraceEvent::FrameStart, TraceEvent::ClearDepth, TraceEvent::Present]
        );
        assert_eq!(coprocessor.stats().deferred_run, 0);
    }

    #[test]
    fn test_unbalanced_frame_is_counted_and_reset() {
        let mut memory = DeviceMemory::new();
        let slot = memory.alloc(&Mat4::from_translation(Vec3::X));
        let mut rasterizer = RecordingRasterizer::default();
        let mut coprocessor = Coprocessor::new();
        let mut queue = CommandQueue::new();

        crate::console::Rasterizer::attach(&mut rasterizer).unwrap();
        coprocessor.frame_start(&mut rasterizer);
        queue.push_matrix(slot);
        coprocessor.present(&mut queue, &memory, &mut rasterizer).unwrap();
        assert_eq!(coprocessor.stats().unbalanced_frames, 1);

        crate::console::Rasterizer::attach(&mut rasterizer).unwrap();
        coprocessor.frame_start(&mut rasterizer);
        assert_eq!(coprocessor.stack().depth(), 0);
    }

    // ============================================================================
    // Update phase
    // ============================================================================

    #[test]
    fn test_update_feeds_atmosphere_and_camera() {
        let input = ScriptedInput::new([InputFrame::holding(Buttons::D_UP)]);
        let mut frame_loop = frame_loop(RecordingRasterizer::default(), input);
        frame_loop.run(Some(60)).unwrap();

        // 60 ticks of 1/60 s
        let atmosphere = frame_loop.atmosphere();
        assert!((atmosphere.cloud_ms - 1000.0).abs() < 0.5);
        assert!((atmosphere.time_of_day - 500.0).abs() < 1.0);

        // Only the first frame held forward
        let position = frame_loop.camera().position();
        assert!(position.abs_diff_eq(Vec3::new(0.0, 155.0, 90.25), 1e-3));
    }
}
